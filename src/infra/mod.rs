// Concrete collaborator implementations behind the app ports

pub mod fs_object_store;
pub mod in_memory;
pub mod sqlite_dedup;
pub mod webhook_notifier;
