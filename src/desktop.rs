use serde::de::DeserializeOwned;
use tauri::{plugin::PluginApi, AppHandle, Runtime};

use crate::models::ProductType;

pub fn init<R: Runtime, C: DeserializeOwned>(
    app: &AppHandle<R>,
    _api: PluginApi<R, C>,
) -> crate::Result<PlayBilling<R>> {
    Ok(PlayBilling(app.clone()))
}

/// Access to the Play Billing APIs.
///
/// Play Billing only exists on Android; every operation here reports the
/// platform as unsupported so host apps can ship one code path.
pub struct PlayBilling<R: Runtime>(AppHandle<R>);

impl<R: Runtime> PlayBilling<R> {
    pub fn is_ready(&self) -> bool {
        false
    }

    pub fn say_hello(&self, _says: Option<String>) -> crate::Result<()> {
        Err(crate::Error::UnsupportedPlatform)
    }

    pub fn start_connection(&self) -> crate::Result<()> {
        Err(crate::Error::UnsupportedPlatform)
    }

    pub fn end_connection(&self) -> crate::Result<()> {
        Err(crate::Error::UnsupportedPlatform)
    }

    pub fn query_purchases(&self, _product_type: ProductType) -> crate::Result<()> {
        Err(crate::Error::UnsupportedPlatform)
    }

    pub fn query_product_details(
        &self,
        _product_ids: Vec<String>,
        _product_type: ProductType,
    ) -> crate::Result<()> {
        Err(crate::Error::UnsupportedPlatform)
    }

    pub fn purchase(
        &self,
        _product_ids: Vec<String>,
        _is_offer_personalized: bool,
    ) -> crate::Result<()> {
        Err(crate::Error::UnsupportedPlatform)
    }

    pub fn subscribe(
        &self,
        _product_ids: Vec<String>,
        _base_plan_ids: Vec<String>,
        _is_offer_personalized: bool,
    ) -> crate::Result<()> {
        Err(crate::Error::UnsupportedPlatform)
    }

    pub fn consume_purchase(&self, _purchase_token: String) -> crate::Result<()> {
        Err(crate::Error::UnsupportedPlatform)
    }

    pub fn acknowledge_purchase(&self, _purchase_token: String) -> crate::Result<()> {
        Err(crate::Error::UnsupportedPlatform)
    }

    pub fn show_in_app_messages(&self) -> crate::Result<()> {
        Err(crate::Error::UnsupportedPlatform)
    }

    pub fn launch_price_change_confirmation_flow(&self) -> crate::Result<()> {
        Err(crate::Error::UnsupportedPlatform)
    }

    pub fn create_alternative_billing_only_reporting_details(&self) -> crate::Result<()> {
        Err(crate::Error::UnsupportedPlatform)
    }

    pub fn report_alternative_billing_only_transaction(&self) -> crate::Result<()> {
        Err(crate::Error::UnsupportedPlatform)
    }
}
