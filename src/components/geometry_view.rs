//! Geometry View Component
//!
//! Read-only summary of the geometry loaded with the project.

use leptos::prelude::*;

use crate::context::AppContext;
use crate::models::GeometrySummary;

#[component]
pub fn GeometryView() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let geometry = Memo::new(move |_| {
        ctx.page.with(|p| p.geometry_summary().zip(p.geometry_text()))
    });

    move || match geometry.get() {
        None => view! { <p class="geometry-empty">"No geometry stored for this project."</p> }.into_any(),
        Some((summary, text)) => view! {
            <div class="geometry-view">
                <dl class="geometry-summary">{summary_rows(&summary)}</dl>
                <pre class="geometry-json">{text}</pre>
            </div>
        }
        .into_any(),
    }
}

fn summary_rows(summary: &GeometrySummary) -> impl IntoView {
    let mut rows = vec![
        ("Type", summary.kind.label().to_string()),
        ("Parts", summary.parts.to_string()),
        ("Vertices", summary.vertices.to_string()),
    ];
    if let Some(wkid) = summary.wkid {
        rows.push(("Spatial reference", format!("WKID {}", wkid)));
    }
    if let Some((x, y)) = summary.start {
        rows.push(("First vertex", format!("{:.6}, {:.6}", x, y)));
    }
    rows.into_iter()
        .map(|(term, value)| view! { <dt>{term}</dt><dd>{value}</dd> })
        .collect_view()
}
