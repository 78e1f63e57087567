use std::sync::Arc;

use crate::domain::service::StaffDirectoryService;

pub struct StaffAppState {
    pub staff_service: Arc<StaffDirectoryService>,
}
