pub mod subscription;

pub use subscription::{create_subscriber, delete_subscriber, get_subscriber, update_subscriber};
