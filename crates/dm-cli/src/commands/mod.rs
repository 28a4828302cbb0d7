//! Command implementations

pub(crate) mod apply;
pub(crate) mod common;
pub(crate) mod create;
pub(crate) mod init;
pub(crate) mod list;
pub(crate) mod rollback;
pub(crate) mod sync;
