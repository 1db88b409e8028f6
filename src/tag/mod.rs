pub mod bound_tag;
pub mod tag_data;
pub mod tag_library;
pub mod tag_spec;

pub use bound_tag::{BoundTag, NoHooks, RawArgs, TagHooks};
pub use tag_data::TagData;
pub use tag_library::TagLibrary;
pub use tag_spec::{TagSpec, TagSpecBuilder};
