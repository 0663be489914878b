use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use klypp_core::analytics::{AnalyticsService, AnalyticsServiceTrait};
use klypp_core::memberships::{MembershipService, MembershipServiceTrait};
use klypp_core::notifications::{
    NotificationService, NotificationServiceTrait, PushDispatcherTrait,
};
use klypp_core::plans::{PlanService, PlanServiceTrait};
use klypp_core::users::{UserService, UserServiceTrait};
use klypp_storage_sqlite::canceled_plans::CanceledPlanRepository;
use klypp_storage_sqlite::db::{self, write_actor};
use klypp_storage_sqlite::memberships::MembershipRepository;
use klypp_storage_sqlite::notifications::NotificationRepository;
use klypp_storage_sqlite::plans::PlanRepository;
use klypp_storage_sqlite::users::UserRepository;

use crate::auth::AuthManager;
use crate::config::Config;
use crate::logo::LogoService;
use crate::push::DevicePushDispatcher;

pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
    pub plan_service: Arc<dyn PlanServiceTrait>,
    pub membership_service: Arc<dyn MembershipServiceTrait>,
    pub notification_service: Arc<dyn NotificationServiceTrait>,
    pub analytics_service: Arc<dyn AnalyticsServiceTrait>,
    pub auth: Arc<AuthManager>,
    pub logo: Option<Arc<LogoService>>,
}

pub fn init_tracing() {
    let fmt_layer = fmt::layer().json().with_current_span(false);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = write_actor::spawn_writer((*pool).clone());

    let user_repository = Arc::new(UserRepository::new(pool.clone(), writer.clone()));
    let plan_repository = Arc::new(PlanRepository::new(pool.clone(), writer.clone()));
    let membership_repository = Arc::new(MembershipRepository::new(pool.clone(), writer.clone()));
    let canceled_plan_repository = Arc::new(CanceledPlanRepository::new(pool.clone()));
    let notification_repository =
        Arc::new(NotificationRepository::new(pool.clone(), writer.clone()));

    let dispatcher: Arc<dyn PushDispatcherTrait> =
        Arc::new(DevicePushDispatcher::new(notification_repository.clone()));

    let user_service: Arc<dyn UserServiceTrait> =
        Arc::new(UserService::new(user_repository.clone()));
    let plan_service: Arc<dyn PlanServiceTrait> =
        Arc::new(PlanService::new(plan_repository.clone()));
    let membership_service: Arc<dyn MembershipServiceTrait> = Arc::new(MembershipService::new(
        membership_repository.clone(),
        plan_repository.clone(),
        user_repository.clone(),
        dispatcher.clone(),
    ));
    let notification_service: Arc<dyn NotificationServiceTrait> = Arc::new(
        NotificationService::new(notification_repository.clone(), dispatcher.clone()),
    );
    let analytics_service: Arc<dyn AnalyticsServiceTrait> = Arc::new(AnalyticsService::new(
        plan_repository.clone(),
        canceled_plan_repository.clone(),
    ));

    let auth = Arc::new(AuthManager::new(&config.jwt_secret, config.token_ttl));
    let logo = config
        .logo_lookup_enabled
        .then(|| Arc::new(LogoService::new()));

    Ok(Arc::new(AppState {
        user_service,
        plan_service,
        membership_service,
        notification_service,
        analytics_service,
        auth,
        logo,
    }))
}
