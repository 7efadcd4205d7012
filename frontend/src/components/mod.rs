pub mod chat;
pub mod group_modal;
pub mod header;
pub mod sidebar;
