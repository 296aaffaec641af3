//! Dashboard page: session summary, profile check and chart summarization.
//!
//! Redirects to `/login` when no access token is stored. The profile request
//! doubles as a session probe: a 401/403 from it tears the session down via
//! the API layer.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use serde_json::{Map, Value};

use crate::state::session::SessionStore;
use crate::util::auth::install_unauth_redirect;
use crate::util::token::{expiry_label, inspect, now_secs};

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

/// Parse the summarization form into the request parts.
fn parse_chart_input(data: &str, chart_config: &str) -> Result<(Vec<Value>, Map<String, Value>), String> {
    let data = match serde_json::from_str::<Value>(data) {
        Ok(Value::Array(rows)) => rows,
        Ok(_) => return Err("Data must be a JSON array.".to_owned()),
        Err(e) => return Err(format!("Data is not valid JSON: {e}")),
    };
    let config = if chart_config.trim().is_empty() {
        Map::new()
    } else {
        match serde_json::from_str::<Value>(chart_config) {
            Ok(Value::Object(map)) => map,
            Ok(_) => return Err("Chart config must be a JSON object.".to_owned()),
            Err(e) => return Err(format!("Chart config is not valid JSON: {e}")),
        }
    };
    Ok((data, config))
}

/// Text to show for a summarization response.
fn summary_text(body: &Value) -> String {
    let summary = body.get("summary").or_else(|| body.get("data").and_then(|d| d.get("summary")));
    match summary {
        Some(Value::String(text)) => text.clone(),
        _ => serde_json::to_string_pretty(body).unwrap_or_default(),
    }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let session = expect_context::<SessionStore>();
    install_unauth_redirect(session.clone(), use_navigate());

    let profile = LocalResource::new({
        let session = session.clone();
        move || {
            let session = session.clone();
            async move { crate::net::api::fetch_protected(&session, contracts::PROFILE_PATH).await }
        }
    });

    let user = session.user();
    let name = user.as_ref().map_or_else(|| "Unknown user".to_owned(), |u| u.display_name().to_owned());
    let role = user.and_then(|u| u.role).unwrap_or_default();
    let expiry = session
        .access_token()
        .and_then(|token| inspect(&token))
        .map_or_else(|| "token not inspectable".to_owned(), |claims| expiry_label(&claims, now_secs()));

    let chart_data = RwSignal::new(String::from("[]"));
    let chart_config = RwSignal::new(String::from("{}"));
    let summary = RwSignal::new(None::<String>);

    let on_logout = {
        let session = session.clone();
        move |_| session.logout()
    };

    let on_summarize = move |_| {
        let (data, config) = match parse_chart_input(&chart_data.get(), &chart_config.get()) {
            Ok(parts) => parts,
            Err(message) => {
                summary.set(Some(message));
                return;
            }
        };
        summary.set(Some("Summarizing...".to_owned()));

        #[cfg(feature = "csr")]
        {
            let session = session.clone();
            leptos::task::spawn_local(async move {
                let text = match crate::net::api::summarize(&session, data, config).await {
                    Ok(body) => summary_text(&body),
                    Err(e) => format!("Summary failed: {e}"),
                };
                summary.set(Some(text));
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (&session, data, config);
        }
    };

    view! {
        <div class="dashboard-page">
            <header class="dashboard-page__header">
                <h1>"Dashboard"</h1>
                <button class="btn" on:click=on_logout>
                    "Log out"
                </button>
            </header>

            <section class="dashboard-page__session">
                <p class="dashboard-page__user">{name}</p>
                <p class="dashboard-page__role">{role}</p>
                <p class="dashboard-page__token">{expiry}</p>
                <Suspense fallback=move || view! { <p>"Checking session..."</p> }>
                    {move || {
                        profile
                            .get()
                            .map(|result| match result {
                                Ok(body) => {
                                    view! {
                                        <pre class="dashboard-page__profile">
                                            {serde_json::to_string_pretty(&body).unwrap_or_default()}
                                        </pre>
                                    }
                                        .into_any()
                                }
                                Err(e) => view! { <p class="dashboard-page__error">{e.to_string()}</p> }.into_any(),
                            })
                    }}
                </Suspense>
            </section>

            <section class="dashboard-page__summarize">
                <h2>"Summarize chart"</h2>
                <textarea
                    class="dialog__input"
                    prop:value=move || chart_data.get()
                    on:input=move |ev| chart_data.set(event_target_value(&ev))
                ></textarea>
                <textarea
                    class="dialog__input"
                    prop:value=move || chart_config.get()
                    on:input=move |ev| chart_config.set(event_target_value(&ev))
                ></textarea>
                <button class="btn btn--primary" on:click=on_summarize>
                    "Summarize"
                </button>
                <Show when=move || summary.get().is_some()>
                    <p class="dashboard-page__summary">{move || summary.get().unwrap_or_default()}</p>
                </Show>
            </section>
        </div>
    }
}
