use crate::pages::{
    DashboardPage, EditNotePage, LoginPage, NewNotePage, NoteViewPage, RegistrationPage,
    RequireAuth,
};
use crate::state::{AppContext, AppState};
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

#[component]
pub fn App() -> impl IntoView {
    provide_context(AppContext(AppState::new()));

    // IMPORTANT:
    // - Leptos CSR requires the `csr` feature on `leptos`.
    // - router hooks require a <Router> context.
    view! {
        <Router>
            <Routes fallback=|| view! { <div class="px-4 py-8 text-xs text-muted-foreground">"Not found"</div> }>
                <Route path=path!("login") view=LoginPage />
                <Route path=path!("signup") view=RegistrationPage />
                <Route path=path!("new") view=move || view! {
                    <RequireAuth>
                        <NewNotePage />
                    </RequireAuth>
                } />
                <Route path=path!("note/:id") view=move || view! {
                    <RequireAuth>
                        <NoteViewPage />
                    </RequireAuth>
                } />
                <Route path=path!("note/:id/edit") view=move || view! {
                    <RequireAuth>
                        <EditNotePage />
                    </RequireAuth>
                } />
                <Route path=path!("") view=move || view! {
                    <RequireAuth>
                        <DashboardPage />
                    </RequireAuth>
                } />
            </Routes>
        </Router>
    }
}
