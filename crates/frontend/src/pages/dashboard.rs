//! Dashboard page: headline counts and recent invoices.

use core_types::{InvoiceStatus, SliceKind};
use yew::prelude::*;

use crate::components::{Loading, StatCard, Timestamp};
use crate::context::use_app_context;
use crate::thunks;

/// Number of invoices listed on the dashboard.
const RECENT_INVOICES: usize = 5;

fn count<T>(data: &Option<Vec<T>>, keep: impl Fn(&T) -> bool) -> AttrValue {
    data.as_ref()
        .map(|items| items.iter().filter(|&item| keep(item)).count().to_string())
        .unwrap_or_else(|| timefmt::EMPTY.to_string())
        .into()
}

#[function_component(DashboardPage)]
pub fn dashboard_page() -> Html {
    let ctx = use_app_context();
    let token = ctx.store.token();

    {
        let ctx = ctx.clone();
        use_effect_with(token, move |token| {
            if token.is_some() {
                thunks::load_dashboard(&ctx);
            }
        });
    }

    let store = &ctx.store;
    let invoices = &store.invoices().data;
    let outstanding = count(invoices, |i| {
        matches!(i.status, InvoiceStatus::Sent | InvoiceStatus::Overdue)
    });

    let recent = match invoices {
        Some(items) => items
            .iter()
            .take(RECENT_INVOICES)
            .map(|invoice| {
                html! {
                    <tr key={invoice.id}>
                        <td>{ &invoice.number }</td>
                        <td>{ &invoice.client_name }</td>
                        <td>{ invoice.amount_display() }</td>
                        <td><Timestamp value={AttrValue::from(invoice.issued_at.clone())} /></td>
                    </tr>
                }
            })
            .collect::<Html>(),
        None if store.is_loading(SliceKind::Invoices) => {
            html! { <tr><td colspan="4"><Loading /></td></tr> }
        }
        None => html! {},
    };

    let errors = SliceKind::ALL
        .iter()
        .filter_map(|kind| store.error(*kind).map(|e| (kind.label(), e.to_string())))
        .map(|(label, error)| html! { <p class="form-error">{ format!("{}: {}", label, error) }</p> })
        .collect::<Html>();

    html! {
        <div>
            <h1>{"Dashboard"}</h1>
            { errors }

            <div class="stats-grid">
                <StatCard
                    value={count(&store.workers().data, |w| w.active)}
                    label="Active workers"
                    pending={store.is_loading(SliceKind::Workers)}
                />
                <StatCard
                    value={count(&store.projects().data, |p| p.active)}
                    label="Active projects"
                    pending={store.is_loading(SliceKind::Projects)}
                />
                <StatCard
                    value={count(&store.tasks().data, |t| t.is_live())}
                    label="Live shifts"
                    pending={store.is_loading(SliceKind::Tasks)}
                />
                <StatCard
                    value={outstanding}
                    label="Outstanding invoices"
                    pending={store.is_loading(SliceKind::Invoices)}
                />
                <StatCard
                    value={count(&store.specializations().data, |_| true)}
                    label="Specializations"
                    pending={store.is_loading(SliceKind::Specializations)}
                />
            </div>

            <div class="card">
                <h2>{"Recent invoices"}</h2>
                <table>
                    <thead>
                        <tr>
                            <th>{"Number"}</th>
                            <th>{"Client"}</th>
                            <th>{"Amount"}</th>
                            <th>{"Issued"}</th>
                        </tr>
                    </thead>
                    <tbody>{ recent }</tbody>
                </table>
            </div>
        </div>
    }
}
