//! Section Tabs Component
//!
//! Tab bar over the form sections. Each tab holds independent sections;
//! the geometry tab shows the stored shape instead.

use leptos::prelude::*;

use crate::components::{GeometryView, SectionForm};
use crate::context::AppContext;

/// Section Tabs component
#[component]
pub fn SectionTabs() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let tabs = ctx.page.with_untracked(|p| p.tabs());
    let active_tab = Memo::new(move |_| ctx.page.with(|p| p.active_tab()));

    view! {
        <div class="section-tab-bar" role="tablist">
            {tabs.iter().enumerate().map(|(index, tab)| {
                let is_active = move || active_tab.get() == index;
                let tab_class = move || {
                    if is_active() { "section-tab active" } else { "section-tab" }
                };
                view! {
                    <button
                        class=tab_class
                        role="tab"
                        on:click=move |_| { ctx.dispatch(|p| p.select_tab(index)); }
                    >
                        {tab.title}
                    </button>
                }
            }).collect_view()}
        </div>

        {move || tabs.get(active_tab.get()).map(|tab| view! {
            <div class="section-tab-panel" role="tabpanel">
                {tab.sections.iter().map(|section| view! { <SectionForm section=section /> }).collect_view()}
                {tab.shows_geometry.then(|| view! { <GeometryView /> })}
            </div>
        })}
    }
}
