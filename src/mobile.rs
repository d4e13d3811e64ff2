use std::sync::{Arc, RwLock};

use serde::Serialize;
use tauri::{
    ipc::{Channel, InvokeResponseBody},
    plugin::{PluginApi, PluginHandle},
    AppHandle, Runtime,
};

use crate::catalog::ProductCatalog;
use crate::connection::{ConnectionState, ConnectionTracker};
use crate::events::{
    self, BillingEvent, HelloPayload, InfoPayload, NotImplementedPayload, PurchaseErrorPayload,
    StatusPayload,
};
use crate::models::*;

const PLUGIN_IDENTIFIER: &str = "app.tauri.playbilling";

pub fn init<R: Runtime>(
    app: &AppHandle<R>,
    api: PluginApi<R, Option<Config>>,
) -> crate::Result<PlayBilling<R>> {
    let config = api.config().clone().unwrap_or_default();
    let handle = api.register_android_plugin(PLUGIN_IDENTIFIER, "PlayBillingPlugin")?;
    Ok(PlayBilling {
        app: app.clone(),
        handle,
        config,
        state: Arc::new(BillingState::default()),
    })
}

#[derive(Default)]
pub(crate) struct BillingState {
    connection: RwLock<ConnectionTracker>,
    catalog: RwLock<ProductCatalog>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StartConnectionRequest {
    channel: Channel,
    enable_pending_one_time_products: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ShowToastRequest {
    message: String,
}

/// Access to the Play Billing APIs.
pub struct PlayBilling<R: Runtime> {
    app: AppHandle<R>,
    handle: PluginHandle<R>,
    config: Config,
    state: Arc<BillingState>,
}

impl<R: Runtime> PlayBilling<R> {
    pub fn is_ready(&self) -> bool {
        self.state.connection.read().unwrap().is_ready()
    }

    pub fn say_hello(&self, says: Option<String>) -> crate::Result<()> {
        let says = says.unwrap_or_else(|| "Hello from the Play Billing plugin".to_string());
        self.handle.run_mobile_plugin::<()>(
            "showToast",
            ShowToastRequest {
                message: says.clone(),
            },
        )?;
        log::info!("{says}");
        events::emit(
            &self.app,
            BillingEvent::HelloResponse(HelloPayload { says: says.clone() }),
        )?;
        events::emit(
            &self.app,
            BillingEvent::BillingInfo(InfoPayload::new("sayHello").with_message(says)),
        )
    }

    pub fn start_connection(&self) -> crate::Result<()> {
        if !self.state.connection.write().unwrap().begin_connection() {
            log::info!("Billing client is already connected");
            return events::emit(&self.app, BillingEvent::Connected);
        }

        log::info!("Starting billing service connection");
        let result = self.handle.run_mobile_plugin::<()>(
            "startConnection",
            StartConnectionRequest {
                channel: self.callback_channel(),
                enable_pending_one_time_products: self.config.enable_pending_one_time_products,
            },
        );
        if let Err(error) = result {
            self.state.connection.write().unwrap().reset();
            log::error!("Failed to start billing service connection: {error}");
            return Err(error.into());
        }
        events::emit(&self.app, BillingEvent::StartConnection)
    }

    pub fn end_connection(&self) -> crate::Result<()> {
        if !self.is_ready() {
            return Ok(());
        }
        log::info!("Ending billing service connection");
        self.handle.run_mobile_plugin::<()>("endConnection", ())?;
        self.state.connection.write().unwrap().reset();
        // Offer tokens are issued per client instance; drop them with it.
        self.state.catalog.write().unwrap().clear();
        events::emit(
            &self.app,
            BillingEvent::BillingInfo(
                InfoPayload::new("endConnection")
                    .with_message("Ending billing service connection.".into()),
            ),
        )
    }

    pub fn query_purchases(&self, product_type: ProductType) -> crate::Result<()> {
        self.ensure_ready()?;
        let response: QueryPurchasesResponse = self
            .handle
            .run_mobile_plugin("queryPurchases", QueryPurchasesRequest { product_type })?;
        if response.status.response_code.is_ok() {
            log::info!(
                "Found {} {} purchases",
                response.purchases.len(),
                product_type.as_str()
            );
        } else {
            log::warn!(
                "No purchases found, response code: {}",
                response.status.response_code.code()
            );
        }
        events::emit(&self.app, events::query_purchases_event(response))
    }

    pub fn query_product_details(
        &self,
        product_ids: Vec<String>,
        product_type: ProductType,
    ) -> crate::Result<()> {
        self.ensure_ready()?;
        if product_ids.is_empty() {
            return Err(crate::Error::InvalidArgument(
                "product id list is empty".into(),
            ));
        }
        let response = self.fetch_product_details(product_ids, product_type)?;
        events::emit(&self.app, events::query_product_details_event(response))
    }

    pub fn purchase(
        &self,
        product_ids: Vec<String>,
        is_offer_personalized: bool,
    ) -> crate::Result<()> {
        self.ensure_ready()?;
        let Some(product_id) = first_id(&product_ids) else {
            log::error!("Cannot start purchase: product id is missing or blank");
            return events::emit(
                &self.app,
                BillingEvent::PurchaseError(PurchaseErrorPayload {
                    response_code: None,
                    debug_message: "Product ID is missing or blank".into(),
                    product_id: None,
                    base_plan_id: None,
                }),
            );
        };
        log::info!("Starting purchase flow for {product_id}");
        self.launch_purchase_flow(product_id, ProductType::Inapp, None, is_offer_personalized)
    }

    pub fn subscribe(
        &self,
        product_ids: Vec<String>,
        base_plan_ids: Vec<String>,
        is_offer_personalized: bool,
    ) -> crate::Result<()> {
        self.ensure_ready()?;
        let (Some(product_id), Some(base_plan_id)) =
            (first_id(&product_ids), first_id(&base_plan_ids))
        else {
            log::error!("Cannot start subscription: product id or base plan id is missing");
            return events::emit(
                &self.app,
                BillingEvent::PurchaseError(PurchaseErrorPayload {
                    response_code: None,
                    debug_message: "Product ID or Base Plan ID is missing.".into(),
                    product_id: first_id(&product_ids),
                    base_plan_id: None,
                }),
            );
        };
        log::info!("Starting purchase flow for {product_id} subscription with base plan {base_plan_id}");
        self.launch_purchase_flow(
            product_id,
            ProductType::Subs,
            Some(base_plan_id),
            is_offer_personalized,
        )
    }

    pub fn consume_purchase(&self, purchase_token: String) -> crate::Result<()> {
        self.ensure_ready()?;
        let response: ConsumePurchaseResponse = self.handle.run_mobile_plugin(
            "consumePurchase",
            ConsumePurchaseRequest {
                purchase_token: purchase_token.clone(),
            },
        )?;
        if response.status.response_code.is_ok() {
            log::info!("Purchase consumed");
        } else {
            log::error!(
                "Error consuming purchase, response code: {}",
                response.status.response_code.code()
            );
        }
        events::emit(&self.app, events::consume_event(purchase_token, response))
    }

    pub fn acknowledge_purchase(&self, purchase_token: String) -> crate::Result<()> {
        self.ensure_ready()?;
        let response: SdkAck = self.handle.run_mobile_plugin(
            "acknowledgePurchase",
            AcknowledgePurchaseRequest {
                purchase_token: purchase_token.clone(),
            },
        )?;
        if response.status.response_code.is_ok() {
            log::info!("Purchase acknowledged");
        } else {
            log::error!(
                "Error acknowledging purchase, response code: {}",
                response.status.response_code.code()
            );
        }
        events::emit(
            &self.app,
            events::acknowledge_event(purchase_token, response.status),
        )
    }

    pub fn show_in_app_messages(&self) -> crate::Result<()> {
        self.relay_stub("showInAppMessages", BillingEvent::InAppMessageResult)
    }

    pub fn launch_price_change_confirmation_flow(&self) -> crate::Result<()> {
        self.relay_stub(
            "launchPriceChangeConfirmationFlow",
            BillingEvent::PriceChangeError,
        )
    }

    pub fn create_alternative_billing_only_reporting_details(&self) -> crate::Result<()> {
        let fun_name = "createAlternativeBillingOnlyReportingDetails";
        log::warn!("{fun_name} is not yet implemented");
        events::emit(
            &self.app,
            BillingEvent::BillingInfo(
                InfoPayload::new(fun_name)
                    .with_message(format!("{fun_name} is not yet implemented.")),
            ),
        )
    }

    pub fn report_alternative_billing_only_transaction(&self) -> crate::Result<()> {
        self.relay_stub(
            "reportAlternativeBillingOnlyTransaction",
            BillingEvent::AlternativeBillingOnlyTransactionReported,
        )
    }

    fn ensure_ready(&self) -> crate::Result<()> {
        if self.is_ready() {
            Ok(())
        } else {
            log::error!("Billing client is not ready");
            Err(crate::Error::NotReady)
        }
    }

    /// Runs a product-details query and folds successful results into the
    /// catalog so later flows can resolve offers from it.
    fn fetch_product_details(
        &self,
        product_ids: Vec<String>,
        product_type: ProductType,
    ) -> crate::Result<QueryProductDetailsResponse> {
        let response: QueryProductDetailsResponse = self.handle.run_mobile_plugin(
            "queryProductDetails",
            QueryProductDetailsRequest {
                product_ids,
                product_type,
            },
        )?;
        if response.status.response_code.is_ok() {
            log::info!(
                "Fetched details for {} products",
                response.product_details.len()
            );
            self.state
                .catalog
                .write()
                .unwrap()
                .extend(response.product_details.iter().cloned());
        }
        Ok(response)
    }

    fn launch_purchase_flow(
        &self,
        product_id: String,
        product_type: ProductType,
        base_plan_id: Option<String>,
        is_offer_personalized: bool,
    ) -> crate::Result<()> {
        if !self.state.catalog.read().unwrap().contains(&product_id) {
            let response = self.fetch_product_details(vec![product_id.clone()], product_type)?;
            if !response.status.response_code.is_ok() || response.product_details.is_empty() {
                log::error!("Error getting product details for {product_id}");
                let debug_message = if response.status.debug_message.is_empty() {
                    format!("No product details found for {product_id}")
                } else {
                    response.status.debug_message
                };
                return events::emit(
                    &self.app,
                    BillingEvent::QueryProductDetailsError(StatusPayload {
                        response_code: response.status.response_code,
                        debug_message,
                    }),
                );
            }
        }

        let offer_token = match base_plan_id.as_deref() {
            Some(base_plan) => {
                let resolved = self
                    .state
                    .catalog
                    .read()
                    .unwrap()
                    .offer_token_for(&product_id, base_plan);
                match resolved {
                    Ok(token) => Some(token),
                    Err(error) => {
                        log::error!("{error}");
                        return events::emit(
                            &self.app,
                            BillingEvent::PurchaseError(PurchaseErrorPayload {
                                response_code: None,
                                debug_message: error.to_string(),
                                product_id: Some(product_id),
                                base_plan_id: base_plan_id.clone(),
                            }),
                        );
                    }
                }
            }
            None => None,
        };

        let response: SdkAck = self.handle.run_mobile_plugin(
            "launchPurchaseFlow",
            LaunchPurchaseFlowRequest {
                product_id: product_id.clone(),
                product_type,
                offer_token,
                is_offer_personalized,
            },
        )?;
        if response.status.response_code.is_ok() {
            log::info!("Purchase flow for {product_id} launched");
            Ok(())
        } else {
            log::error!("{product_id} purchase flow launch failed");
            events::emit(
                &self.app,
                BillingEvent::PurchaseError(PurchaseErrorPayload {
                    response_code: Some(response.status.response_code),
                    debug_message: response.status.debug_message,
                    product_id: Some(product_id),
                    base_plan_id,
                }),
            )
        }
    }

    fn relay_stub(
        &self,
        fun_name: &'static str,
        event: fn(NotImplementedPayload) -> BillingEvent,
    ) -> crate::Result<()> {
        log::warn!("{fun_name} is not yet implemented");
        let payload = NotImplementedPayload::new(fun_name);
        let message = payload.debug_message.clone();
        events::emit(&self.app, event(payload))?;
        events::emit(
            &self.app,
            BillingEvent::BillingInfo(InfoPayload::new(fun_name).with_message(message)),
        )
    }

    fn callback_channel(&self) -> Channel {
        let app = self.app.clone();
        let state = self.state.clone();
        Channel::new(move |event| {
            let callback = match event {
                InvokeResponseBody::Json(payload) => {
                    match serde_json::from_str::<SdkCallback>(&payload) {
                        Ok(callback) => callback,
                        Err(error) => {
                            log::error!("Failed to deserialize billing callback: {error}");
                            return Ok(());
                        }
                    }
                }
                _ => return Ok(()),
            };
            handle_callback(&app, &state, callback);
            Ok(())
        })
    }
}

fn first_id(ids: &[String]) -> Option<String> {
    ids.first()
        .map(|id| id.trim())
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

fn handle_callback<R: Runtime>(app: &AppHandle<R>, state: &BillingState, callback: SdkCallback) {
    let event = match callback {
        SdkCallback::SetupFinished {
            response_code,
            debug_message,
        } => {
            let reached = state
                .connection
                .write()
                .unwrap()
                .on_setup_finished(response_code);
            if reached == ConnectionState::Connected {
                log::info!("Billing service connected");
                Some(BillingEvent::Connected)
            } else {
                log::error!(
                    "Billing setup failed with response code: {}",
                    response_code.code()
                );
                Some(BillingEvent::BillingInfo(
                    InfoPayload::new("startConnection").with_status(response_code, debug_message),
                ))
            }
        }
        SdkCallback::ServiceDisconnected => {
            state.connection.write().unwrap().on_service_disconnected();
            log::warn!("Billing service disconnected");
            Some(BillingEvent::Disconnected)
        }
        SdkCallback::PurchasesUpdated {
            response_code,
            debug_message,
            purchases,
        } => events::purchases_update_event(response_code, debug_message, purchases),
    };

    if let Some(event) = event {
        if let Err(error) = events::emit(app, event) {
            log::error!("Failed to emit billing event: {error}");
        }
    }
}
