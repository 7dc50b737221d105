use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::NaiveDate;
use fd_lock::RwLock;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shift_eligibility::approvals::{
    LongTermAbsence, PlannedAbsence, RecordId, RepositoryError, ReviewRecord, ReviewRepository,
    Revision,
};
use shift_eligibility::error::AppError;
use shift_eligibility::scheduling::{
    AvailabilityInputs, Competency, Employee, RosterShift, ServiceLine, Workplace,
};
use shift_eligibility::validation::{parse_iso_date, ValidationError};
use uuid::Uuid;

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    parse_iso_date("date", raw).map_err(|err| err.to_string())
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// Everything the resolvers read, as exported by the roster application.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RosterSnapshot {
    #[serde(default)]
    pub(crate) employees: Vec<Employee>,
    #[serde(default)]
    pub(crate) workplaces: Vec<Workplace>,
    #[serde(default)]
    pub(crate) competencies: Vec<Competency>,
    #[serde(default)]
    pub(crate) service_lines: Vec<ServiceLine>,
    #[serde(default)]
    pub(crate) roster_shifts: Vec<RosterShift>,
    #[serde(default)]
    pub(crate) planned_absences: Vec<PlannedAbsence>,
    #[serde(default)]
    pub(crate) long_term_absences: Vec<LongTermAbsence>,
}

impl RosterSnapshot {
    pub(crate) fn load(path: &Path, standby_key: &str) -> Result<Self, AppError> {
        let snapshot: Self = read_json(path)?;
        snapshot.validate(standby_key)?;
        Ok(snapshot)
    }

    pub(crate) fn validate(&self, standby_key: &str) -> Result<(), ValidationError> {
        for employee in &self.employees {
            employee.validate()?;
            employee
                .shift_preferences
                .validate(&self.service_lines, standby_key)?;
        }
        for workplace in &self.workplaces {
            workplace.validate()?;
        }
        for absence in &self.planned_absences {
            absence.validate()?;
        }
        for absence in &self.long_term_absences {
            absence.validate()?;
        }
        Ok(())
    }

    pub(crate) fn employee(&self, id: &str) -> Result<&Employee, AppError> {
        self.employees
            .iter()
            .find(|employee| employee.id.0 == id)
            .ok_or_else(|| AppError::NotFound {
                kind: "employee",
                id: id.to_string(),
            })
    }

    pub(crate) fn workplace(&self, id: &str) -> Result<&Workplace, AppError> {
        self.workplaces
            .iter()
            .find(|workplace| workplace.id.0 == id)
            .ok_or_else(|| AppError::NotFound {
                kind: "workplace",
                id: id.to_string(),
            })
    }

    pub(crate) fn inputs<'a>(&'a self, standby_key: &'a str) -> AvailabilityInputs<'a> {
        AvailabilityInputs::new(
            &self.planned_absences,
            &self.long_term_absences,
            &self.roster_shifts,
        )
        .with_standby_key(standby_key)
    }
}

/// Review records kept as a JSON array on disk. Every read-check-write holds
/// an exclusive lock on a `.lock` file next to the store, so separate
/// processes sharing one store serialise. Each write goes to its own staging
/// file that then replaces the store.
pub(crate) struct FileReviewRepository<T> {
    path: PathBuf,
    lock: Mutex<()>,
    _record: PhantomData<fn() -> T>,
}

impl<T> FileReviewRepository<T> {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
            _record: PhantomData,
        }
    }
}

fn unavailable(err: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::Unavailable(err.to_string())
}

impl<T> FileReviewRepository<T>
where
    T: ReviewRecord + Serialize + DeserializeOwned,
{
    fn read_all(&self) -> Result<Vec<T>, RepositoryError> {
        match File::open(&self.path) {
            Ok(file) => serde_json::from_reader(BufReader::new(file)).map_err(unavailable),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(unavailable(err)),
        }
    }

    fn write_all(&self, records: &[T]) -> Result<(), RepositoryError> {
        let staging = self
            .path
            .with_extension(format!("json.{}.tmp", Uuid::new_v4().simple()));
        let written = Self::write_to(&staging, records)
            .and_then(|()| fs::rename(&staging, &self.path).map_err(unavailable));
        if written.is_err() {
            let _ = fs::remove_file(&staging);
        }
        written
    }

    fn write_to(staging: &Path, records: &[T]) -> Result<(), RepositoryError> {
        let file = File::create(staging).map_err(unavailable)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, records).map_err(unavailable)?;
        writer.flush().map_err(unavailable)
    }

    /// Run `work` holding the in-process mutex and the store's file lock.
    fn exclusive<V>(
        &self,
        work: impl FnOnce() -> Result<V, RepositoryError>,
    ) -> Result<V, RepositoryError> {
        let _local = self.lock.lock().map_err(unavailable)?;
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.path.with_extension("json.lock"))
            .map_err(unavailable)?;
        let mut lock = RwLock::new(file);
        let _held = lock.write().map_err(unavailable)?;
        work()
    }

    fn position(records: &[T], id: &RecordId) -> Option<usize> {
        records.iter().position(|record| record.id() == id)
    }
}

impl<T> ReviewRepository<T> for FileReviewRepository<T>
where
    T: ReviewRecord + Serialize + DeserializeOwned,
{
    fn fetch(&self, id: &RecordId) -> Result<Option<T>, RepositoryError> {
        self.exclusive(|| {
            let mut records = self.read_all()?;
            Ok(Self::position(&records, id).map(|index| records.swap_remove(index)))
        })
    }

    fn insert(&self, record: T) -> Result<T, RepositoryError> {
        self.exclusive(|| {
            let mut records = self.read_all()?;
            if Self::position(&records, record.id()).is_some() {
                return Err(RepositoryError::Conflict(record.id().clone()));
            }
            records.push(record.clone());
            self.write_all(&records)?;
            Ok(record)
        })
    }

    fn replace_if_current(&self, record: T, expected: Revision) -> Result<T, RepositoryError> {
        self.exclusive(|| {
            let mut records = self.read_all()?;
            let index = Self::position(&records, record.id())
                .ok_or_else(|| RepositoryError::NotFound(record.id().clone()))?;
            let found = records[index].revision();
            if found != expected {
                return Err(RepositoryError::Stale {
                    id: record.id().clone(),
                    expected,
                    found,
                });
            }
            records[index] = record.clone();
            self.write_all(&records)?;
            Ok(record)
        })
    }
}
