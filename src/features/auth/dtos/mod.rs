pub mod auth_dto;

pub use auth_dto::{LoginFormDto, LoginQueryDto, OAuthCallbackQueryDto, OAuthLoginQueryDto};
