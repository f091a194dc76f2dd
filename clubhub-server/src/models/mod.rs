//! Request models with validation at construction
//!
//! All user input is validated when building these types.
//! Invalid input returns ValidationError, not panic.

pub mod blog;
pub mod event;
pub mod id;
pub mod member;
pub mod pagination;
pub mod validation;

pub use blog::{BlogFilter, BlogPatch, CreateBlogRequest, NewBlog, UpdateBlogRequest};
pub use event::{
    parse_event_date, CreateEventRequest, EventFilter, EventPatch, EventWindow, NewEvent,
    UpdateEventRequest,
};
pub use id::parse_object_id;
pub use member::{
    Email, Interests, MemberFilter, MemberPatch, NewMember, RegisterMemberRequest,
    UpdateMemberRequest,
};
pub use pagination::{Paginated, Pagination, PaginationParams};
pub use validation::ValidationError;
