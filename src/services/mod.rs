pub mod links;
pub mod users;

pub use links::LinkService;
pub use users::UserService;
