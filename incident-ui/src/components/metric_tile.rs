use leptos::*;
use portal_core::metrics::MetricTile as Tile;

#[component]
pub fn MetricTile(tile: Tile) -> impl IntoView {
    view! {
      <div class="tile">
        <div class="value" style=format!("color: {}", tile.color)>{tile.value}</div>
        <div class="label">{tile.label}</div>
        {tile.subtext.map(|s| view! { <div class="meta">{s}</div> })}
      </div>
    }
}
