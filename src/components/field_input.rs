//! Field Input Component
//!
//! One typed input bound to a (section, field) widget value.

use leptos::prelude::*;

use crate::context::AppContext;
use crate::models::{FieldDescriptor, SectionSpec, WidgetKind};

#[component]
pub fn FieldInput(
    section: &'static SectionSpec,
    descriptor: &'static FieldDescriptor,
) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let value = Memo::new(move |_| {
        ctx.page.with(|p| {
            p.render_section(section)
                .into_iter()
                .find(|f| f.descriptor.name == descriptor.name)
                .map(|f| f.value.as_input_string())
                .unwrap_or_default()
        })
    });
    let capture = move |raw: String| {
        ctx.dispatch(|p| p.edit(section, descriptor.name, &raw));
    };
    let input_id = format!("{}-{}", section.id, descriptor.name);

    let widget = match descriptor.kind {
        WidgetKind::Text => view! {
            <input id=input_id.clone() type="text" prop:value=move || value.get() on:input=move |ev| capture(event_target_value(&ev)) />
        }.into_any(),
        WidgetKind::Number => view! {
            <input id=input_id.clone() type="number" step="any" prop:value=move || value.get() on:input=move |ev| capture(event_target_value(&ev)) />
        }.into_any(),
        WidgetKind::Date => view! {
            <input id=input_id.clone() type="date" prop:value=move || value.get() on:input=move |ev| capture(event_target_value(&ev)) />
        }.into_any(),
        WidgetKind::LongText => view! {
            <textarea id=input_id.clone() rows="4" prop:value=move || value.get() on:input=move |ev| capture(event_target_value(&ev))></textarea>
        }.into_any(),
        WidgetKind::Select => view! {
            <select id=input_id.clone() on:change=move |ev| capture(event_target_value(&ev))>
                <option value="" selected=move || value.get().is_empty()>""</option>
                {descriptor.options.iter().map(|option| view! {
                    <option value=*option selected=move || value.get() == *option>{*option}</option>
                }).collect_view()}
            </select>
        }.into_any(),
    };

    view! {
        <div class="field-row">
            <label for=input_id>{descriptor.label}</label>
            {widget}
        </div>
    }
}
