//! Reactive parameter core.
//!
//! This crate provides the building blocks shared by every ptyx component:
//!
//! - [`Publisher`] / [`Subscriber`]: synchronous, single-threaded change
//!   notification with batching and a re-entrancy guard
//! - [`Parameter`]: a typed, optionally bounded value cell with a canonical
//!   text form and optional parent wiring
//! - [`ParameterGroup`]: a named tree of parameters and child groups
//! - [`SettingsRegistry`]: top-level groups persisted as a TOML settings file
//! - [`ParameterSnapshot`]: detached editing copies with explicit
//!   [`commit`] and [`revert`]
//!
//! # Example
//!
//! ```
//! use ptyx_params::SettingsRegistry;
//!
//! let registry = SettingsRegistry::new();
//! let object = registry.create_group("Object").unwrap();
//! let slices = object
//!     .create_integer_parameter("NumberOfSlices", 1, Some(1), None)
//!     .unwrap();
//!
//! slices.set_value(0);
//! assert_eq!(slices.get_value(), 1);
//! ```

pub mod complex;
pub mod error;
pub mod group;
pub mod observer;
pub mod parameter;
pub mod settings;
pub mod snapshot;
pub mod value;

pub use complex::{Complex64, ParseComplexError};
pub use error::{ParamsError, Result};
pub use group::ParameterGroup;
pub use observer::{CallbackSubscriber, PublishBatch, Publisher, PublisherState, Subscriber};
pub use parameter::{AnyParameter, Parameter};
pub use settings::{LoadSummary, PathPrefixChange, SettingsDocument, SettingsRegistry};
pub use snapshot::{ParameterSnapshot, commit, revert};
pub use value::{Bounded, ParameterKind, ParameterValue, TRUE_VALUES};
