use std::collections::BTreeMap;
use std::rc::Rc;

use axum::{
    Json, Router,
    extract::State,
    response::Html,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::{debug, info};

use crate::config::{DEFAULT_MODULE, ServerConfig};
use crate::identifier::{AbsoluteIdent, ModuleIdent};
use crate::loader::{MemorySource, ModuleLoader};
use crate::numerals::ChurchNumerals;

static INDEX_HTML: &str = include_str!("../index.html");

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunRequest {
    // shorthand for a single module named `main`
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub modules: BTreeMap<String, String>,
    // `module/name` or a bare name in `main`
    #[serde(default)]
    pub entry: Option<String>,
    #[serde(default)]
    pub max_steps: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunResponse {
    fn failure(error: impl ToString) -> Self {
        RunResponse {
            result: None,
            steps: None,
            error: Some(error.to_string()),
        }
    }
}

// never runs more than `config.max_steps` reductions
pub fn evaluate(req: &RunRequest, config: &ServerConfig) -> RunResponse {
    let step_cap = config.max_steps;
    let mut source: MemorySource = req
        .modules
        .iter()
        .map(|(name, text)| (name.as_str(), text.as_str()))
        .collect();
    if let Some(text) = &req.text {
        source.insert(DEFAULT_MODULE, text.as_str());
    }
    let default_module = ModuleIdent::new(DEFAULT_MODULE);
    let entry = AbsoluteIdent::parse(
        req.entry.as_deref().unwrap_or(DEFAULT_MODULE),
        &default_module,
    );
    let max_steps = req.max_steps.map_or(step_cap, |steps| steps.min(step_cap));
    debug!(entry = %entry, max_steps, "evaluating request");

    let numerals = Rc::new(ChurchNumerals::with_limit(config.max_numeral));
    let loader = ModuleLoader::new(source).with_numerals(numerals);
    let evaluation = loader
        .load_context(&entry.module)
        .and_then(|context| context.eval_bounded(&entry, max_steps));
    match evaluation {
        Ok(evaluation) => RunResponse {
            result: Some(evaluation.normal_form.to_string()),
            steps: Some(evaluation.steps),
            error: None,
        },
        Err(err) => RunResponse::failure(err),
    }
}

async fn run(State(config): State<ServerConfig>, Json(req): Json<RunRequest>) -> Json<RunResponse> {
    // reduction is CPU bound and may take up to the whole step budget
    let response = tokio::task::spawn_blocking(move || evaluate(&req, &config))
        .await
        .unwrap_or_else(|err| RunResponse::failure(format!("evaluation aborted: {}", err)));
    Json(response)
}

pub fn router(config: ServerConfig) -> Router {
    Router::new()
        .route("/", get(|| async { Html(INDEX_HTML) }))
        .route("/run", post(run))
        .with_state(config)
}

pub async fn serve(config: ServerConfig) -> std::io::Result<()> {
    let listener = TcpListener::bind(config.addr).await?;
    info!(addr = %config.addr, "listening");
    println!("→ open http://{}", config.addr);
    axum::serve(listener, router(config)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capped(max_steps: usize) -> ServerConfig {
        ServerConfig {
            max_steps,
            ..ServerConfig::default()
        }
    }

    fn request(text: &str) -> RunRequest {
        RunRequest {
            text: Some(text.to_string()),
            ..RunRequest::default()
        }
    }

    #[test]
    fn single_module() {
        let response = evaluate(&request("SUCC = λn.λf.λx.f (n f x);\nmain = SUCC 0;"), &capped(1000));
        assert_eq!(response.result.as_deref(), Some("λf.λx.f x"));
        assert!(response.error.is_none());
    }

    #[test]
    fn named_modules_and_entry() {
        let mut modules = BTreeMap::new();
        modules.insert("lib".to_string(), "K = λx.λy.x;".to_string());
        modules.insert("app".to_string(), "import lib;\ngo = lib/K 3;".to_string());
        let req = RunRequest {
            modules,
            entry: Some("app/go".to_string()),
            ..RunRequest::default()
        };
        let response = evaluate(&req, &capped(1000));
        assert_eq!(response.result.as_deref(), Some("λy.λf.λx.f (f (f x))"));
    }

    #[test]
    fn step_cap_applies() {
        let req = RunRequest {
            max_steps: Some(1_000_000),
            ..request("Y = λf.(λx.f (x x)) (λx.f (x x));\nmain = Y (λr.λx.r x);")
        };
        let response = evaluate(&req, &capped(20));
        assert_eq!(
            response.error.as_deref(),
            Some("evaluation did not converge after 20 steps")
        );
    }

    #[test]
    fn errors_are_reported() {
        let response = evaluate(&request("main = (x;"), &capped(10));
        assert!(response.result.is_none());
        assert!(
            response
                .error
                .as_deref()
                .is_some_and(|e| e.starts_with("syntax error in module main")),
            "{:?}",
            response.error
        );
        let response = evaluate(&RunRequest::default(), &capped(10));
        assert_eq!(
            response.error.as_deref(),
            Some("module main not found at main")
        );
    }

    #[test]
    fn deep_nesting_is_a_syntax_error() {
        let n = 200_000;
        let req = request(&format!("main = {}x{};", "(".repeat(n), ")".repeat(n)));
        // same stack size as the runtime's blocking threads
        let response = std::thread::Builder::new()
            .stack_size(2 * 1024 * 1024)
            .spawn(move || evaluate(&req, &capped(10)))
            .unwrap()
            .join()
            .unwrap();
        let error = response.error.unwrap_or_default();
        assert!(error.contains("nested deeper"), "{}", error);
    }

    #[test]
    fn numeral_literals_are_capped() {
        let config = ServerConfig {
            max_numeral: 50,
            ..capped(100)
        };
        let response = evaluate(&request("main = 1000000;"), &config);
        assert_eq!(
            response.error.as_deref(),
            Some("numeral 1000000 exceeds the limit of 50")
        );
        let response = evaluate(&request("main = 50;"), &config);
        assert!(response.error.is_none(), "{:?}", response.error);
    }
}
