pub mod page;
pub mod page_layout;
pub mod portfolio;
pub mod template;
pub mod widget_instance;
pub mod widget_type;

pub use page::{Page, MAIN_PAGE_KEY};
pub use page_layout::PageLayout;
pub use portfolio::{CreatePortfolio, NewPortfolio, Portfolio, UpdatePortfolio};
pub use template::{PortfolioTemplate, TemplateWidgetConfig};
pub use widget_instance::{NewWidgetInstance, WidgetInstance, WidgetInstanceWithType};
pub use widget_type::WidgetTypeRow;
