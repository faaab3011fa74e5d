//! Shared data types for the store tables

mod enums;
mod transactional;

pub use enums::{OrderStatus, UserRole};

pub use transactional::{
    ListOrdersParams, ListProductsParams, ListUsersParams, NewOrderItem, NewProduct,
    OrderItemRow, OrderRow, OrderWithItems, ProductRow, ProductUpdate, UserRow, UserUpdate,
    page_offset,
};
