//! Cart Handlers

pub(crate) mod add_item;
pub(crate) mod delete;
pub(crate) mod discount;
pub(crate) mod get;
pub(crate) mod remove_item;
pub(crate) mod replace;
pub(crate) mod update_item;
