/// Data models: users, items, tags, and the item-tag association

pub mod item;
pub mod item_tag;
pub mod tag;
pub mod user;
