mod app;
mod bridge;
mod components;

fn main() {
    leptos::mount_to_body(app::App);
}
