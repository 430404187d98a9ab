mod health;
mod likes;
mod photos;
mod uploads;

pub use health::health;
pub use likes::{add_like, add_like_top, get_all_likes, get_likes, top_likes, top_likes_default};
pub use photos::{delete_photo, list_photos, upload_photo};
pub use uploads::serve_upload;
