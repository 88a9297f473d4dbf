//! Member store adapters.

mod in_memory;
mod json_file;

pub use in_memory::InMemoryMemberStore;
pub use json_file::JsonFileMemberStore;
