mod user;

pub use user::{LoginRequest, LoginResponse, SeedData, SeedUser, User};
