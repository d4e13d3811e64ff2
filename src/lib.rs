use tauri::{
  plugin::{Builder, TauriPlugin},
  Manager, Runtime,
};

pub use models::*;

#[cfg(target_os = "android")]
mod mobile;
#[cfg(not(target_os = "android"))]
mod desktop;

#[cfg(any(target_os = "android", test))]
mod catalog;
#[cfg(any(target_os = "android", test))]
mod connection;
#[cfg(any(target_os = "android", test))]
mod events;

mod commands;
mod error;
mod models;

pub use error::{Error, Result};

#[cfg(target_os = "android")]
use mobile::PlayBilling;
#[cfg(not(target_os = "android"))]
use desktop::PlayBilling;

/// Extensions to [`tauri::App`], [`tauri::AppHandle`] and [`tauri::Window`] to access the Play Billing APIs.
pub trait PlayBillingExt<R: Runtime> {
  fn play_billing(&self) -> &PlayBilling<R>;
}

impl<R: Runtime, T: Manager<R>> crate::PlayBillingExt<R> for T {
  fn play_billing(&self) -> &PlayBilling<R> {
    self.state::<PlayBilling<R>>().inner()
  }
}

/// Initializes the plugin.
pub fn init<R: Runtime>() -> TauriPlugin<R, Option<Config>> {
  Builder::<R, Option<Config>>::new("play-billing")
    .invoke_handler(tauri::generate_handler![
      commands::is_ready,
      commands::say_hello,
      commands::start_connection,
      commands::end_connection,
      commands::query_purchases,
      commands::query_product_details,
      commands::purchase,
      commands::subscribe,
      commands::consume_purchase,
      commands::acknowledge_purchase,
      commands::show_in_app_messages,
      commands::launch_price_change_confirmation_flow,
      commands::create_alternative_billing_only_reporting_details,
      commands::report_alternative_billing_only_transaction,
    ])
    .setup(|app, api| {
      #[cfg(target_os = "android")]
      let billing = mobile::init(app, api)?;
      #[cfg(not(target_os = "android"))]
      let billing = desktop::init(app, api)?;
      app.manage(billing);
      Ok(())
    })
    .build()
}
