//! Argument declarations and their cleaning rules.
//!
//! An [`Arg`] is built once, when a tag is defined, and is immutable from then
//! on. Every resolved value passes through [`Arg::base_clean`], which applies
//! the shared gates (single item, null bypass) before handing the value to
//! the argument's [`Cleaner`].

pub mod arg;
pub mod cleaners;
pub mod model_instance_arg;

pub use arg::{Arg, ArgBuilder};
pub use cleaners::{
    BasicArg, BooleanArg, Cleaner, DateArg, DateTimeArg, IntegerArg, StringArg, TimeArg, ValueDomain,
};
pub use model_instance_arg::ModelInstanceArg;
