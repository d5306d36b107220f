use crate::{
    config::AppConfig,
    errors::ServiceResult,
    services::{
        artwork_service::ArtworkService,
        auth_service::AuthService,
        inquiry_service::InquiryService,
        notifier::{Notifier, UltraMsgNotifier},
        rate_limiter::SlidingWindowLimiter,
        settings_service::SettingsService,
        stats_service::StatsService,
        upload_service::{LocalUploader, UploadAdapter},
        visit_service::VisitService,
    },
};
use axum::extract::FromRef;
use sqlx::SqlitePool;
use std::{path::PathBuf, sync::Arc};
use tracing::info;

/// Shared state handed to every handler.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub auth: AuthService,
    pub artworks: ArtworkService,
    pub inquiries: InquiryService,
    pub visits: VisitService,
    pub settings: SettingsService,
    pub stats: StatsService,
    pub uploader: Arc<dyn UploadAdapter>,
    pub db: Arc<SqlitePool>,

    #[from_ref(skip)]
    pub upload_dir: PathBuf,
    #[from_ref(skip)]
    pub admin_ui_dir: PathBuf,
    #[from_ref(skip)]
    pub secure_cookies: bool,
    #[from_ref(skip)]
    pub migration_secret: String,
}

impl AppState {
    pub fn new(db: Arc<SqlitePool>, cfg: &AppConfig) -> ServiceResult<Self> {
        let notifier: Option<Arc<dyn Notifier>> = match UltraMsgNotifier::from_config(&cfg.notifier)? {
            Some(notifier) => Some(Arc::new(notifier)),
            None => {
                info!("UltraMsg not configured; inquiry notifications disabled");
                None
            }
        };

        Ok(Self {
            auth: AuthService::new(db.clone(), &cfg.jwt_secret),
            artworks: ArtworkService::new(db.clone()),
            inquiries: InquiryService::new(db.clone(), notifier),
            visits: VisitService::new(db.clone(), Arc::new(SlidingWindowLimiter::for_visits())),
            settings: SettingsService::new(db.clone()),
            stats: StatsService::new(db.clone()),
            uploader: Arc::new(LocalUploader::new(&cfg.upload_dir)),
            db,
            upload_dir: PathBuf::from(&cfg.upload_dir),
            admin_ui_dir: PathBuf::from(&cfg.admin_ui_dir),
            secure_cookies: cfg.secure_cookies,
            migration_secret: cfg.migration_secret.clone(),
        })
    }
}
