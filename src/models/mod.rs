//! Wire models for departments, processes, and subprocesses.

pub mod department;
pub mod process;
pub mod subprocess;
pub mod timestamp;

pub use department::{CreateDepartment, Department, UpdateDepartment};
pub use process::{CreateProcess, Process, UpdateProcess};
pub use subprocess::{CreateSubProcess, SubProcess, UpdateSubProcess};

use serde::{Deserialize, Deserializer};

/// Decode `null` the same way as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
