//! Nutrack MCP Server Implementation
//!
//! Exposes the tracker as MCP tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::config::Config;
use crate::lookup::{ChatCompletionLookup, LookupError, NutritionLookup};
use crate::models::{FieldInput, FoodItemForm, FoodItemId};
use crate::store::SqliteStore;
use crate::tools::charts::ChartKind;
use crate::tools::status::{StatusTracker, TrackerSummary};
use crate::tools::{activity, dashboard, days, error_message, food_items, lookup, parse_date};
use crate::tracker::Tracker;

/// Nutrack MCP Service
#[derive(Clone)]
pub struct NutrackService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    /// All tracker state; never held across an await
    tracker: Arc<std::sync::Mutex<Tracker<SqliteStore>>>,
    lookup: Arc<dyn NutritionLookup>,
    config: Arc<Config>,
    tool_router: ToolRouter<NutrackService>,
}

impl NutrackService {
    pub fn new(config: Config, tracker: Tracker<SqliteStore>) -> Self {
        let lookup = ChatCompletionLookup::new(config.lookup_url.clone(), config.lookup_model.clone());
        info!(endpoint = lookup.endpoint(), model = lookup.model(), "Nutrition lookup configured");
        Self::with_lookup(config, tracker, Arc::new(lookup))
    }

    pub fn with_lookup(
        config: Config,
        tracker: Tracker<SqliteStore>,
        lookup: Arc<dyn NutritionLookup>,
    ) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(config.database_path.clone()))),
            tracker: Arc::new(std::sync::Mutex::new(tracker)),
            lookup,
            config: Arc::new(config),
            tool_router: Self::tool_router(),
        }
    }

    /// Run `f` with the tracker locked
    fn with_tracker<T>(
        &self,
        f: impl FnOnce(&mut Tracker<SqliteStore>) -> Result<T, String>,
    ) -> Result<T, String> {
        let mut tracker = self
            .tracker
            .lock()
            .map_err(|_| "Tracker state is unavailable after an earlier failure".to_string())?;
        f(&mut tracker)
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Food Item Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListFoodItemsParams {
    /// Case-insensitive name filter
    pub query: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddFoodItemParams {
    pub name: String,
    /// Number or numeric text; empty or non-numeric counts as 0
    pub calories: Option<FieldInput>,
    pub protein: Option<FieldInput>,
    pub fats: Option<FieldInput>,
    pub carbs: Option<FieldInput>,
    /// Also log the new item on the active date
    #[serde(default)]
    pub log: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FoodItemIdParams {
    pub id: FoodItemId,
}

// ============================================================================
// Day / Activity Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ChangeDateParams {
    /// YYYY-MM-DD
    pub date: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogWeightParams {
    pub weight: FieldInput,
    /// YYYY-MM-DD, defaults to today
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogStepsParams {
    pub steps: FieldInput,
    /// YYYY-MM-DD, defaults to today
    pub date: Option<String>,
}

// ============================================================================
// Lookup / Dashboard Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LookupNutritionParams {
    pub food_name: String,
    /// Overrides the configured GROQ_API_KEY
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SubmitDraftParams {
    #[serde(default)]
    pub log: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DashboardParams {
    /// Last day of the window, defaults to today
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RenderChartsParams {
    /// Last day of the window, defaults to today
    pub date: Option<String>,
    /// Charts to render; all five when empty
    #[serde(default)]
    pub charts: Vec<ChartKind>,
    /// Directory for the PNG files, defaults to NUTRACK_CHART_DIR
    pub output_dir: Option<String>,
}

#[tool_router]
impl NutrackService {
    // --- Status ---

    #[tool(description = "Get the current status of the nutrack service including build info, database status, tracker contents and process information")]
    async fn nutrack_status(&self) -> Result<CallToolResult, McpError> {
        let summary = self
            .with_tracker(|t| Ok(TrackerSummary::of(t)))
            .map_err(|e| McpError::internal_error(e, None))?;
        let status_tracker = self.status_tracker.lock().await;
        let status = status_tracker.get_status(summary, self.config.api_key.is_some());
        to_json(&status)
    }

    #[tool(description = "Get instructions for logging food, weight and steps. Call this when starting a tracking session or when unsure how to use the tools.")]
    fn tracker_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::TRACKER_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(TRACKER_INSTRUCTIONS)]))
    }

    // --- Food Items ---

    #[tool(description = "List the food catalog, optionally filtered by a case-insensitive name search")]
    fn list_food_items(&self, Parameters(p): Parameters<ListFoodItemsParams>) -> Result<CallToolResult, McpError> {
        let result = self
            .with_tracker(|t| food_items::list_food_items(t, p.query.as_deref()))
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Add a food item to the catalog. Nutrition values are per serving; set log=true to also log it on the active date.")]
    fn add_food_item(&self, Parameters(p): Parameters<AddFoodItemParams>) -> Result<CallToolResult, McpError> {
        let form = FoodItemForm {
            name: p.name,
            calories: p.calories,
            protein: p.protein,
            fats: p.fats,
            carbs: p.carbs,
        };
        let result = self
            .with_tracker(|t| food_items::add_food_item(t, form, p.log))
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    // --- Daily Log ---

    #[tool(description = "Log one serving of a catalog item on the active date. Selecting it again increases the count.")]
    fn select_food_item(&self, Parameters(p): Parameters<FoodItemIdParams>) -> Result<CallToolResult, McpError> {
        let result = self
            .with_tracker(|t| days::select_food_item(t, p.id))
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Remove one serving of an item from the active date")]
    fn remove_selected_item(&self, Parameters(p): Parameters<FoodItemIdParams>) -> Result<CallToolResult, McpError> {
        let result = self
            .with_tracker(|t| days::remove_selected_item(t, p.id))
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Change the active date and return its food log")]
    fn change_date(&self, Parameters(p): Parameters<ChangeDateParams>) -> Result<CallToolResult, McpError> {
        let date = parse_date(Some(p.date.as_str())).map_err(|e| McpError::invalid_params(e, None))?;
        let result = self
            .with_tracker(|t| days::change_date(t, date))
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Get the active date's food log with rounded nutrition totals")]
    fn get_daily_log(&self) -> Result<CallToolResult, McpError> {
        let result = self
            .with_tracker(|t| Ok(days::get_daily_log(t)))
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Weight & Steps ---

    #[tool(description = "Record body weight for a date, replacing any earlier value for that date")]
    fn log_weight(&self, Parameters(p): Parameters<LogWeightParams>) -> Result<CallToolResult, McpError> {
        let date = parse_date(p.date.as_deref()).map_err(|e| McpError::invalid_params(e, None))?;
        let result = self
            .with_tracker(|t| activity::log_weight(t, date, p.weight))
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Record the step count for a date, replacing any earlier value for that date")]
    fn log_steps(&self, Parameters(p): Parameters<LogStepsParams>) -> Result<CallToolResult, McpError> {
        let date = parse_date(p.date.as_deref()).map_err(|e| McpError::invalid_params(e, None))?;
        let result = self
            .with_tracker(|t| activity::log_steps(t, date, p.steps))
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    // --- Auto-fill ---

    #[tool(description = "Look up nutrition for a food name and keep the result as a draft for review. Needs an API key (api_key or GROQ_API_KEY).")]
    async fn lookup_nutrition(&self, Parameters(p): Parameters<LookupNutritionParams>) -> Result<CallToolResult, McpError> {
        let food_name = p.food_name.trim().to_string();
        let credential = self.config.credential(p.api_key.as_deref()).to_string();

        let ticket = self
            .with_tracker(|t| t.begin_lookup(&food_name, &credential).map_err(error_message))
            .map_err(|e| McpError::invalid_params(e, None))?;
        debug!(ticket = ticket.id(), food = %food_name, "Starting nutrition lookup");

        let client = Arc::clone(&self.lookup);
        let result = tokio::task::spawn_blocking(move || client.lookup(&food_name, &credential))
            .await
            .unwrap_or_else(|e| {
                Err(LookupError::Transport {
                    status: None,
                    message: format!("Lookup task failed: {}", e),
                })
            });

        let response = self
            .with_tracker(|t| {
                let result = t.finish_lookup(ticket, result);
                lookup::lookup_response(t, result)
            })
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&response)
    }

    #[tool(description = "Show the current nutrition draft from the last lookup")]
    fn get_nutrition_draft(&self) -> Result<CallToolResult, McpError> {
        let result = self
            .with_tracker(|t| Ok(lookup::get_draft(t)))
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Add the reviewed nutrition draft to the catalog; set log=true to also log it on the active date")]
    fn submit_nutrition_draft(&self, Parameters(p): Parameters<SubmitDraftParams>) -> Result<CallToolResult, McpError> {
        let result = self
            .with_tracker(|t| lookup::submit_draft(t, p.log))
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    // --- Dashboard ---

    #[tool(description = "Get seven days of calories, macros, weight and steps ending at a date, plus each metric scaled to its weekly maximum")]
    fn get_dashboard(&self, Parameters(p): Parameters<DashboardParams>) -> Result<CallToolResult, McpError> {
        let date = parse_date(p.date.as_deref()).map_err(|e| McpError::invalid_params(e, None))?;
        let result = self
            .with_tracker(|t| Ok(dashboard::get_dashboard(t, date)))
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Render the dashboard charts (calories, macros, weight, steps, combined) as PNG files and return their paths")]
    async fn render_dashboard_charts(&self, Parameters(p): Parameters<RenderChartsParams>) -> Result<CallToolResult, McpError> {
        let date = parse_date(p.date.as_deref()).map_err(|e| McpError::invalid_params(e, None))?;
        let dir = p
            .output_dir
            .map(PathBuf::from)
            .unwrap_or_else(|| self.config.chart_dir.clone());
        let snapshot = self
            .with_tracker(|t| Ok(t.dashboard(date)))
            .map_err(|e| McpError::internal_error(e, None))?;

        // Drawing and file writes happen off the tracker lock
        let kinds = p.charts;
        let result = tokio::task::spawn_blocking(move || {
            dashboard::render_dashboard_charts(&snapshot, &kinds, &dir)
        })
        .await
        .map_err(|e| McpError::internal_error(format!("Chart task failed: {}", e), None))?
        .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }
}

#[tool_handler]
impl ServerHandler for NutrackService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "nutrack".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Nutrition Tracker".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Nutrition Tracker (nutrack) - daily food, weight and step logging. \
                 Call tracker_instructions first. \
                 Catalog: list_food_items, add_food_item. \
                 Daily log: select_food_item, remove_selected_item, change_date, get_daily_log. \
                 Activity: log_weight, log_steps. \
                 Auto-fill: lookup_nutrition, get_nutrition_draft, submit_nutrition_draft. \
                 Dashboard: get_dashboard, render_dashboard_charts. \
                 Status: nutrack_status."
                    .into(),
            ),
        }
    }
}
