pub mod zoom;

pub use zoom::{ZoomConfig, ZoomConnectionInfo, ZoomMeeting, ZoomRefreshedTokens};
