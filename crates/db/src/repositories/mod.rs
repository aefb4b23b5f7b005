//! Table repositories. Each is a stateless struct with associated async
//! functions taking a `&PgPool`.

mod dashboard_repo;
mod escalation_repo;
mod event_repo;
mod game_score_repo;
mod notification_repo;
mod qr_repo;
mod report_repo;
mod role_repo;
mod service_category_repo;
mod session_repo;
mod survey_repo;
mod ticket_repo;
mod unit_repo;
mod user_repo;
mod visitor_repo;

pub use dashboard_repo::{DashboardRepo, OverviewCounts};
pub use escalation_repo::EscalationRepo;
pub use event_repo::EventRepo;
pub use game_score_repo::GameScoreRepo;
pub use notification_repo::NotificationRepo;
pub use qr_repo::QrRepo;
pub use report_repo::{ReportRepo, TicketReportRow};
pub use role_repo::RoleRepo;
pub use service_category_repo::ServiceCategoryRepo;
pub use session_repo::SessionRepo;
pub use survey_repo::SurveyRepo;
pub use ticket_repo::TicketRepo;
pub use unit_repo::{UnitRepo, UnitTypeRepo};
pub use user_repo::UserRepo;
pub use visitor_repo::VisitorRepo;
