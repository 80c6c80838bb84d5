//! Wire types shared between the disc-golf backend and its clients.

pub mod model;
pub mod requests;
