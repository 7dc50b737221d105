pub mod attendance;
pub mod availability;
pub mod domain;
pub mod eligibility;
pub mod recurrence;
pub mod roles;

#[cfg(test)]
mod tests;

pub use attendance::{AttendanceBoard, AttendanceCounts, AttendanceSnapshot, AttendanceStatus};
pub use availability::{
    is_absent, is_on_duty, is_on_duty_excluding, resolve_availability, AbsenceCause,
    Availability, AvailabilityInputs,
};
pub use domain::{
    Competency, CompetencyId, CompetencyRequirement, Employee, EmployeeId, Recurrence,
    RelationType, RosterShift, ServiceLine, ServiceLineKey, ShiftPreferences, WeekdaySetting,
    Workplace, WorkplaceId, DEFAULT_STANDBY_SERVICE_KEY,
};
pub use eligibility::{
    assignment_verdict, eligible_service_lines, is_eligible_for_room,
    is_eligible_for_room_with_catalog, matches_competencies, matches_competencies_with_catalog,
    matches_role_requirements, selectable_override_lines, AssignmentVerdict, BlockReason,
};
pub use recurrence::{matches_recurrence, setting_for_date, weekday_occurrence_in_month};
pub use roles::{
    normalize_role, role_capability_keys, role_groups, CanonicalRole, CapabilityKey, RoleGroup,
};
