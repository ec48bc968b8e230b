use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::config::ReminderSettings;
use crate::entities::SensorRegistry;
use crate::scheduler::ReminderScheduler;
use crate::service::{BirthdayService, SharedService};

#[derive(Clone)]
pub struct AppState {
    pub service: SharedService,
    pub scheduler: Arc<Mutex<ReminderScheduler>>,
    pub sensors: Arc<SensorRegistry>,
    pub settings: Arc<RwLock<ReminderSettings>>,
}

impl AppState {
    /// Wire the service to a sensor registry and an idle scheduler.
    ///
    /// The scheduler is not started; call `schedule` on it once a runtime is up.
    pub fn new(mut service: BirthdayService, settings: ReminderSettings) -> Self {
        let sensors = Arc::new(SensorRegistry::from_records(&service.records()));
        service.subscribe(sensors.clone());
        service.set_default_reminder_days(settings.default_reminder_days.clone());

        let service = service.into_shared();
        let scheduler = ReminderScheduler::new(service.clone());

        Self {
            service,
            scheduler: Arc::new(Mutex::new(scheduler)),
            sensors,
            settings: Arc::new(RwLock::new(settings)),
        }
    }
}
