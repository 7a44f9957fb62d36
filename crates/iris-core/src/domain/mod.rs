//! 봇 명령어 처리를 위한 도메인 모델.

mod article;
mod market;
mod position;
mod quote;
mod watchlist;

pub use article::*;
pub use market::*;
pub use position::*;
pub use quote::*;
pub use watchlist::*;
