pub mod aggregates;
pub use aggregates::{AggregateError, AggregateProvider, AggregateSource, SiteContext};

pub mod pagination;
pub use pagination::{Page, PageWindow, paginate};

pub mod query;
pub use query::{QueryComposer, SearchMatcher};

pub mod view_counter;
pub use view_counter::{IncrementOutcome, ViewCounter};

pub mod preview;
pub use preview::{Preview, PreviewRequest, render_preview};

pub mod catalog_service;
pub mod catalog_service_impl;
pub use catalog_service::{CatalogError, CatalogService};
pub use catalog_service_impl::SeaOrmCatalogService;

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, LoginResult, UserInfo};
pub use auth_service_impl::SeaOrmAuthService;
