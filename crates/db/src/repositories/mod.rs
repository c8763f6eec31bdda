mod page_layout_repo;
mod page_repo;
mod portfolio_repo;
mod template_repo;
mod widget_instance_repo;
mod widget_type_repo;

pub use page_layout_repo::PageLayoutRepo;
pub use page_repo::PageRepo;
pub use portfolio_repo::PortfolioRepo;
pub use template_repo::TemplateRepo;
pub use widget_instance_repo::WidgetInstanceRepo;
pub use widget_type_repo::WidgetTypeRepo;
