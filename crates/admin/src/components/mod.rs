//! View-model components shared by the page handlers.

pub mod charts;
pub mod criteria;
pub mod list_filter;
pub mod nav;

pub use charts::{BarColumn, PieSlice, bar_columns, pie_slices};
pub use criteria::{
    CategoryGroup, PlatformCriteria, PlatformQuery, ReviewCriteria, ReviewQuery, UserCriteria,
    UserQuery, distinct_categories, group_by_category,
};
pub use list_filter::{Choice, Criteria, FilterOption, TableFilter, TextQuery};
pub use nav::{NavItem, NavMenu, menu_for};
