pub mod defaults;
pub mod config_file;

//
// Types
//
pub type Name = String;
pub type NameSpace = String;
pub type Uid = String;

/// opaque token identifying a stored revision of an object
pub type ResourceVersion = String;

/// monotonically increasing counter maintained by a storage backend
pub type Revision = u64;

/// storage path of an object
pub type StorageKey = String;
