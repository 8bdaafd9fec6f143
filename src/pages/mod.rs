use crate::api::{ApiErrorKind, SaveNoteRequest};
use crate::components::ui::{
    Alert, AlertDescription, Badge, Button, ButtonSize, ButtonVariant, Card, CardContent,
    CardDescription, CardHeader, CardTitle, Input, Label, Select, Spinner, Textarea,
};
use crate::models::{Category, Note};
use crate::notes::{self, CategoryFilter};
use crate::state::{AppContext, NotesController};
use crate::storage::save_user_to_storage;
use crate::util::{append_summary_block, format_created_at};
use leptos::ev;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dom::helpers::window_event_listener;
use leptos_router::hooks::{use_navigate, use_params_map};
use std::str::FromStr;
use strum::IntoEnumIterator;

fn note_href(id: &str) -> String {
    format!("/note/{}", urlencoding::encode(id))
}

fn edit_href(id: &str) -> String {
    format!("/note/{}/edit", urlencoding::encode(id))
}

fn category_label(category: Option<Category>) -> String {
    category
        .map(|c| c.to_string())
        .unwrap_or_else(|| "Uncategorized".to_string())
}

fn category_badge_class(category: Option<Category>) -> &'static str {
    match category {
        Some(Category::Work) => "bg-blue-600 text-white",
        Some(Category::Personal) => "bg-pink-600 text-white",
        Some(Category::Ideas) => "bg-green-600 text-white",
        Some(Category::Research) => "bg-yellow-600 text-white",
        Some(Category::Meeting) => "bg-purple-600 text-white",
        None => "bg-gray-600 text-white",
    }
}

/// Editor form validation, shared by the create and update pages. The
/// backend also validates; this is only the "fill all fields" gate the
/// form shows without a round-trip.
fn validate_note_form(
    title: &str,
    content: &str,
    category: &str,
    summary: Option<String>,
) -> Result<SaveNoteRequest, String> {
    let title = title.trim();
    if title.is_empty() {
        return Err("Title is required".to_string());
    }

    if content.trim().is_empty() {
        return Err("Content is required".to_string());
    }

    let Ok(category) = Category::from_str(category.trim()) else {
        return Err("Pick a category".to_string());
    };

    Ok(SaveNoteRequest {
        title: title.to_string(),
        content: content.to_string(),
        category: Some(category),
        summary: summary.filter(|s| !s.trim().is_empty()),
    })
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let email: RwSignal<String> = RwSignal::new(String::new());
    let password: RwSignal<String> = RwSignal::new(String::new());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(false);

    let app_state = expect_context::<AppContext>();

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let email_val = email.get();
        let password_val = password.get();
        let mut api_client = app_state.0.api_client.get_untracked();

        loading.set(true);
        error.set(None);

        let controller = NotesController::new(app_state.clone());
        let app_state = app_state.clone();
        spawn_local(async move {
            match api_client.login(&email_val, &password_val).await {
                Ok(response) => {
                    api_client.set_token(response.token);
                    api_client.save_to_storage();
                    save_user_to_storage(&response.user);
                    app_state.0.api_client.set(api_client);
                    app_state.0.current_user.set(Some(response.user));
                    // New identity: the previous account's notes must not
                    // survive into this session.
                    controller.invalidate();
                    let _ = window().location().set_href("/");
                }
                Err(e) => {
                    error.set(Some(e.to_string()));
                }
            }
            loading.set(false);
        });
    };

    view! {
        <div class="min-h-screen bg-background">
            <div class="mx-auto flex min-h-screen w-full max-w-sm flex-col justify-center px-4 py-10">
                <div class="mb-6 flex items-center justify-center">
                    <a href="/" class="text-sm font-medium text-foreground">"AI Notes"</a>
                </div>

                <Card>
                    <CardHeader>
                        <CardTitle class="text-lg">"Log in"</CardTitle>
                        <CardDescription class="text-xs">"Use your email and password to continue."</CardDescription>
                    </CardHeader>

                    <CardContent>
                        <form class="flex flex-col gap-3" on:submit=on_submit>
                            <div class="flex flex-col gap-1.5">
                                <Label html_for="email" class="text-xs">"Email"</Label>
                                <Input
                                    id="email"
                                    r#type="email"
                                    placeholder="you@example.com"
                                    bind_value=email
                                    required=true
                                    class="h-8 text-sm"
                                />
                            </div>

                            <div class="flex flex-col gap-1.5">
                                <Label html_for="password" class="text-xs">"Password"</Label>
                                <Input
                                    id="password"
                                    r#type="password"
                                    placeholder="••••••••"
                                    bind_value=password
                                    required=true
                                    class="h-8 text-sm"
                                />
                            </div>

                            <Show when=move || error.get().is_some() fallback=|| ().into_view()>
                                {move || {
                                    error.get().map(|e| {
                                        view! {
                                            <Alert class="border-destructive/30">
                                                <AlertDescription class="text-destructive text-xs">
                                                    {e}
                                                </AlertDescription>
                                            </Alert>
                                        }
                                    })
                                }}
                            </Show>

                            <Button
                                class="w-full"
                                size=ButtonSize::Sm
                                attr:disabled=move || loading.get()
                            >
                                <span class="inline-flex items-center gap-2">
                                    <Show when=move || loading.get() fallback=|| ().into_view()>
                                        <Spinner />
                                    </Show>
                                    {move || if loading.get() { "Signing in..." } else { "Continue" }}
                                </span>
                            </Button>

                            <div class="pt-1 text-xs text-muted-foreground">
                                "No account? "
                                <a class="text-primary underline underline-offset-4" href="/signup">"Sign up"</a>
                            </div>
                        </form>
                    </CardContent>
                </Card>
            </div>
        </div>
    }
}

#[component]
pub fn RegistrationPage() -> impl IntoView {
    let name: RwSignal<String> = RwSignal::new(String::new());
    let email: RwSignal<String> = RwSignal::new(String::new());
    let password: RwSignal<String> = RwSignal::new(String::new());
    let confirm_password: RwSignal<String> = RwSignal::new(String::new());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(false);
    let success: RwSignal<bool> = RwSignal::new(false);

    let app_state = expect_context::<AppContext>();

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let name_val = name.get();
        let email_val = email.get();
        let password_val = password.get();
        let confirm_password_val = confirm_password.get();
        let api_client = app_state.0.api_client.get_untracked();

        if name_val.trim().is_empty() {
            error.set(Some("Name is required".to_string()));
            return;
        }

        if password_val != confirm_password_val {
            error.set(Some("Passwords do not match".to_string()));
            return;
        }

        if password_val.len() < 6 {
            error.set(Some("Password must be at least 6 characters".to_string()));
            return;
        }

        loading.set(true);
        error.set(None);

        spawn_local(async move {
            match api_client.signup(&name_val, &email_val, &password_val).await {
                Ok(_response) => {
                    // The backend returns a token on signup; we keep UX simple
                    // and ask the user to sign in.
                    success.set(true);
                }
                Err(e) => {
                    error.set(Some(e.to_string()));
                }
            }
            loading.set(false);
        });
    };

    view! {
        <div class="min-h-screen bg-background">
            <div class="mx-auto flex min-h-screen w-full max-w-sm flex-col justify-center px-4 py-10">
                <div class="mb-6 flex items-center justify-center">
                    <a href="/" class="text-sm font-medium text-foreground">"AI Notes"</a>
                </div>

                <Card>
                    <CardHeader>
                        <CardTitle class="text-lg">"Create account"</CardTitle>
                        <CardDescription class="text-xs">"Notes and AI summaries, one account."</CardDescription>
                    </CardHeader>
                    <CardContent>
                        <Show
                            when=move || !success.get()
                            fallback=move || view! {
                                <Alert>
                                    <AlertDescription class="text-xs">
                                        "Account created. You can now "
                                        <a class="text-primary underline underline-offset-4" href="/login">"log in"</a>
                                        "."
                                    </AlertDescription>
                                </Alert>
                            }
                        >
                            <form class="flex flex-col gap-3" on:submit=on_submit>
                                <div class="flex flex-col gap-1.5">
                                    <Label html_for="name" class="text-xs">"Name"</Label>
                                    <Input
                                        id="name"
                                        r#type="text"
                                        placeholder="Your name"
                                        bind_value=name
                                        required=true
                                        class="h-8 text-sm"
                                    />
                                </div>

                                <div class="flex flex-col gap-1.5">
                                    <Label html_for="email" class="text-xs">"Email"</Label>
                                    <Input
                                        id="email"
                                        r#type="email"
                                        placeholder="you@example.com"
                                        bind_value=email
                                        required=true
                                        class="h-8 text-sm"
                                    />
                                </div>

                                <div class="flex flex-col gap-1.5">
                                    <Label html_for="password" class="text-xs">"Password"</Label>
                                    <Input
                                        id="password"
                                        r#type="password"
                                        placeholder="••••••••"
                                        bind_value=password
                                        required=true
                                        class="h-8 text-sm"
                                    />
                                </div>

                                <div class="flex flex-col gap-1.5">
                                    <Label html_for="confirm_password" class="text-xs">"Confirm password"</Label>
                                    <Input
                                        id="confirm_password"
                                        r#type="password"
                                        placeholder="••••••••"
                                        bind_value=confirm_password
                                        required=true
                                        class="h-8 text-sm"
                                    />
                                </div>

                                <Show when=move || error.get().is_some() fallback=|| ().into_view()>
                                    {move || {
                                        error.get().map(|e| {
                                            view! {
                                                <Alert class="border-destructive/30">
                                                    <AlertDescription class="text-destructive text-xs">
                                                        {e}
                                                    </AlertDescription>
                                                </Alert>
                                            }
                                        })
                                    }}
                                </Show>

                                <Button
                                    class="w-full"
                                    size=ButtonSize::Sm
                                    attr:disabled=move || loading.get()
                                >
                                    <span class="inline-flex items-center gap-2">
                                        <Show when=move || loading.get() fallback=|| ().into_view()>
                                            <Spinner />
                                        </Show>
                                        {move || if loading.get() { "Creating..." } else { "Continue" }}
                                    </span>
                                </Button>

                                <div class="pt-1 text-xs text-muted-foreground">
                                    "Already have an account? "
                                    <a class="text-primary underline underline-offset-4" href="/login">"Log in"</a>
                                </div>
                            </form>
                        </Show>
                    </CardContent>
                </Card>
            </div>
        </div>
    }
}

/// Authenticated shell: anything behind it renders the login page until a
/// token is present.
#[component]
pub fn RequireAuth(children: ChildrenFn) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let is_authenticated = move || app_state.0.api_client.get().is_authenticated();

    view! {
        <Show when=is_authenticated fallback=move || view! { <LoginPage /> }>
            {children()}
        </Show>
    }
}

#[component]
fn Navbar() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let search_query = app_state.0.search_query;

    let display_name = move || {
        app_state
            .0
            .current_user
            .get()
            .and_then(|u| {
                u.extra
                    .get("name")
                    .or_else(|| u.extra.get("email"))
                    .and_then(|v| v.as_str())
                    .map(|s| s.to_string())
            })
            .unwrap_or_default()
    };

    let on_logout = move |_| {
        let mut api_client = app_state.0.api_client.get_untracked();
        api_client.logout();
        app_state.0.api_client.set(api_client);
        app_state.0.current_user.set(None);
        NotesController::new(app_state.clone()).invalidate();
        let _ = window().location().set_href("/login");
    };

    view! {
        <header class="sticky top-0 z-40 flex h-14 items-center gap-4 border-b bg-background px-4">
            <a href="/" class="text-sm font-semibold">"AI Notes"</a>

            <div class="relative mx-auto w-full max-w-md">
                <svg
                    xmlns="http://www.w3.org/2000/svg"
                    width="16"
                    height="16"
                    viewBox="0 0 24 24"
                    fill="none"
                    stroke="currentColor"
                    stroke-width="2"
                    stroke-linecap="round"
                    stroke-linejoin="round"
                    class="absolute left-2.5 top-1/2 -translate-y-1/2 text-muted-foreground"
                    aria-hidden="true"
                >
                    <circle cx="11" cy="11" r="8" />
                    <path d="m21 21-4.3-4.3" />
                </svg>
                <Input
                    id="search"
                    r#type="search"
                    placeholder="Search notes..."
                    bind_value=search_query
                    class="h-8 pl-8 text-sm"
                />
            </div>

            <div class="flex items-center gap-2">
                <span class="hidden text-xs text-muted-foreground sm:inline">{display_name}</span>
                <Button variant=ButtonVariant::Outline size=ButtonSize::Sm on:click=on_logout>
                    "Sign out"
                </Button>
            </div>
        </header>
    }
}

#[component]
fn Sidebar() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let notes = app_state.0.notes;
    let selected = app_state.0.selected_category;

    view! {
        <aside class="w-56 shrink-0 border-r bg-background p-3">
            <div class="mb-2 px-2 text-xs font-medium text-muted-foreground">"Categories"</div>
            <nav class="flex flex-col gap-1">
                {move || {
                    notes::category_counts(notes.get().notes())
                        .into_iter()
                        .map(|(filter, count)| {
                            let is_selected = move || selected.get() == filter;
                            view! {
                                <button
                                    class="flex items-center justify-between rounded-md px-2 py-1.5 text-sm transition-colors hover:bg-accent hover:text-accent-foreground"
                                    class:bg-accent=is_selected
                                    class:text-accent-foreground=is_selected
                                    on:click=move |_| selected.set(filter)
                                >
                                    <span>{filter.to_string()}</span>
                                    <span class="text-xs text-muted-foreground">{count}</span>
                                </button>
                            }
                        })
                        .collect_view()
                }}
            </nav>
        </aside>
    }
}

#[component]
fn NoteCard(note: Note, menu_open_id: RwSignal<Option<String>>) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let controller = NotesController::new(app_state.clone());
    let navigate = StoredValue::new(use_navigate());

    let id = note.id.clone();
    let pinned = note.pinned;

    let id_for_menu = id.clone();
    let menu_open = move || menu_open_id.get().as_deref() == Some(id_for_menu.as_str());

    let id_for_toggle = id.clone();
    let controller_for_toggle = controller.clone();
    let on_toggle_pin = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        controller_for_toggle.set_pinned(&id_for_toggle, !pinned);
    };

    let id_for_menu_btn = id.clone();
    let on_menu = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        if menu_open_id.get_untracked().as_deref() == Some(id_for_menu_btn.as_str()) {
            menu_open_id.set(None);
        } else {
            menu_open_id.set(Some(id_for_menu_btn.clone()));
        }
    };

    let id_for_view = id.clone();
    let on_view = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        menu_open_id.set(None);
        navigate.with_value(|nav| nav(&note_href(&id_for_view), Default::default()));
    };

    let id_for_edit = id.clone();
    let on_edit = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        menu_open_id.set(None);
        navigate.with_value(|nav| nav(&edit_href(&id_for_edit), Default::default()));
    };

    let id_for_delete = id.clone();
    let on_delete = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        menu_open_id.set(None);
        let confirmed = window()
            .confirm_with_message("Delete this note? This cannot be undone.")
            .unwrap_or(false);
        if confirmed {
            controller.delete(id_for_delete.clone());
        }
    };

    let id_for_open = id.clone();
    let on_open = move |_| {
        navigate.with_value(|nav| nav(&note_href(&id_for_open), Default::default()));
    };

    view! {
        <Card
            class="group relative cursor-pointer gap-3 py-4 transition-colors hover:bg-accent/40"
            on:click=on_open
        >
            <CardHeader class="px-4">
                <div class="flex w-full items-start justify-between gap-2">
                    <CardTitle class="truncate text-sm">{note.title.clone()}</CardTitle>

                    <div class="flex items-center gap-1">
                        <Button
                            variant=ButtonVariant::Ghost
                            size=ButtonSize::Icon
                            class="h-7 w-7"
                            attr:title=if pinned { "Unpin" } else { "Pin" }
                            on:click=on_toggle_pin
                        >
                            <svg
                                xmlns="http://www.w3.org/2000/svg"
                                width="16"
                                height="16"
                                viewBox="0 0 24 24"
                                fill=if pinned { "currentColor" } else { "none" }
                                stroke="currentColor"
                                stroke-width="2"
                                stroke-linecap="round"
                                stroke-linejoin="round"
                                class=if pinned { "text-primary" } else { "text-muted-foreground" }
                                aria-hidden="true"
                            >
                                <path d="M12 17v5" />
                                <path d="M9 10.76a2 2 0 0 1-1.11 1.79l-1.78.9A2 2 0 0 0 5 15.24V16a1 1 0 0 0 1 1h12a1 1 0 0 0 1-1v-.76a2 2 0 0 0-1.11-1.79l-1.78-.9A2 2 0 0 1 15 10.76V7a1 1 0 0 1 1-1 2 2 0 0 0 0-4H8a2 2 0 0 0 0 4 1 1 0 0 1 1 1z" />
                            </svg>
                        </Button>

                        <Button
                            variant=ButtonVariant::Ghost
                            size=ButtonSize::Icon
                            class="h-7 w-7"
                            attr:title="More"
                            on:click=on_menu
                        >
                            <svg
                                xmlns="http://www.w3.org/2000/svg"
                                width="16"
                                height="16"
                                viewBox="0 0 24 24"
                                fill="none"
                                stroke="currentColor"
                                stroke-width="2"
                                stroke-linecap="round"
                                stroke-linejoin="round"
                                class="text-muted-foreground"
                                aria-hidden="true"
                            >
                                <circle cx="12" cy="5" r="1" />
                                <circle cx="12" cy="12" r="1" />
                                <circle cx="12" cy="19" r="1" />
                            </svg>
                        </Button>
                    </div>
                </div>

                <div class="flex items-center gap-2">
                    <Badge class=category_badge_class(note.category)>
                        {category_label(note.category)}
                    </Badge>
                    <CardDescription class="text-xs">
                        {format_created_at(&note.created_at)}
                    </CardDescription>
                </div>
            </CardHeader>

            <CardContent class="px-4">
                <p class="line-clamp-3 text-xs text-muted-foreground">{note.content.clone()}</p>
            </CardContent>

            <Show when=menu_open fallback=|| ().into_view()>
                <div class="absolute right-2 top-10 z-10 w-32 rounded-md border bg-background p-1 shadow-md">
                    <button
                        class="flex w-full items-center gap-2 rounded-sm px-2 py-1.5 text-sm hover:bg-accent hover:text-accent-foreground"
                        on:click=on_view.clone()
                    >
                        <svg xmlns="http://www.w3.org/2000/svg" width="14" height="14" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" aria-hidden="true">
                            <path d="M2 12s3-7 10-7 10 7 10 7-3 7-10 7-10-7-10-7Z" />
                            <circle cx="12" cy="12" r="3" />
                        </svg>
                        "View"
                    </button>
                    <button
                        class="flex w-full items-center gap-2 rounded-sm px-2 py-1.5 text-sm hover:bg-accent hover:text-accent-foreground"
                        on:click=on_edit.clone()
                    >
                        <svg xmlns="http://www.w3.org/2000/svg" width="14" height="14" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" aria-hidden="true">
                            <path d="M12 20h9" />
                            <path d="M16.5 3.5a2.121 2.121 0 0 1 3 3L7 19l-4 1 1-4Z" />
                        </svg>
                        "Edit"
                    </button>
                    <button
                        class="flex w-full items-center gap-2 rounded-sm px-2 py-1.5 text-sm text-destructive hover:bg-accent"
                        on:click=on_delete.clone()
                    >
                        <svg xmlns="http://www.w3.org/2000/svg" width="14" height="14" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" aria-hidden="true">
                            <path d="M3 6h18" />
                            <path d="M8 6V4h8v2" />
                            <path d="M19 6l-1 14H6L5 6" />
                            <path d="M10 11v6" />
                            <path d="M14 11v6" />
                        </svg>
                        "Delete"
                    </button>
                </div>
            </Show>
        </Card>
    }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let controller = NotesController::new(app_state.clone());

    let notes = app_state.0.notes;
    let notes_loading = app_state.0.notes_loading;
    let notes_error = app_state.0.notes_error;
    let action_error = app_state.0.action_error;
    let selected = app_state.0.selected_category;
    let search_query = app_state.0.search_query;

    let menu_open_id: RwSignal<Option<String>> = RwSignal::new(None);

    // Close any open card menu when clicking elsewhere. Card buttons stop
    // propagation, so only genuine outside clicks land here.
    let _click_handle = window_event_listener(ev::click, move |_ev: web_sys::MouseEvent| {
        if menu_open_id.get_untracked().is_some() {
            menu_open_id.set(None);
        }
    });

    {
        let controller = controller.clone();
        Effect::new(move |_| {
            controller.load(false);
        });
    }

    let filtered = Memo::new(move |_| {
        let store = notes.get();
        notes::view(store.notes(), selected.get(), &search_query.get())
    });

    let heading = move || match selected.get() {
        CategoryFilter::All => "All Notes".to_string(),
        CategoryFilter::Only(c) => c.to_string(),
    };

    let count_line = move || {
        let n = filtered.get().len();
        if n == 1 {
            "1 note".to_string()
        } else {
            format!("{n} notes")
        }
    };

    let retry = {
        let controller = controller.clone();
        move |_| controller.load(true)
    };

    view! {
        <div class="min-h-screen bg-background text-foreground">
            <Navbar />

            <div class="flex">
                <Sidebar />

                <main class="flex-1 p-6">
                    <div class="mb-6 flex items-start justify-between">
                        <div class="space-y-1">
                            <h2 class="text-2xl font-bold">{heading}</h2>
                            <p class="text-sm text-muted-foreground">{count_line}</p>
                        </div>

                        <a href="/new">
                            <Button>
                                <svg
                                    xmlns="http://www.w3.org/2000/svg"
                                    width="16"
                                    height="16"
                                    viewBox="0 0 24 24"
                                    fill="none"
                                    stroke="currentColor"
                                    stroke-width="2"
                                    stroke-linecap="round"
                                    stroke-linejoin="round"
                                    aria-hidden="true"
                                >
                                    <path d="M5 12h14" />
                                    <path d="M12 5v14" />
                                </svg>
                                "New Note"
                            </Button>
                        </a>
                    </div>

                    // Delete/pin failures: the list itself is still valid,
                    // so this renders above it instead of replacing it.
                    <Show when=move || action_error.get().is_some() fallback=|| ().into_view()>
                        {move || {
                            action_error.get().map(|e| view! {
                                <Alert class="mb-4 border-destructive/30">
                                    <AlertDescription class="flex items-center justify-between text-destructive text-xs">
                                        <span>{e.to_string()}</span>
                                        <Button
                                            variant=ButtonVariant::Ghost
                                            size=ButtonSize::Sm
                                            on:click=move |_| action_error.set(None)
                                        >
                                            "Dismiss"
                                        </Button>
                                    </AlertDescription>
                                </Alert>
                            })
                        }}
                    </Show>

                    // Loading, errored, empty account, and empty filter result
                    // are four different situations and render as four
                    // different things.
                    <Show
                        when=move || !notes_loading.get()
                        fallback=|| view! {
                            <div class="flex items-center justify-center gap-2 py-12 text-sm text-muted-foreground">
                                <Spinner />
                                "Loading notes..."
                            </div>
                        }
                    >
                        <Show
                            when=move || notes_error.get().is_none()
                            fallback=move || {
                                let retry = retry.clone();
                                view! {
                                    <Alert class="border-destructive/30">
                                        <AlertDescription class="flex items-center justify-between text-destructive text-sm">
                                            <span>
                                                "Couldn't load your notes: "
                                                {move || notes_error.get().map(|e| e.to_string()).unwrap_or_default()}
                                            </span>
                                            <Button
                                                variant=ButtonVariant::Outline
                                                size=ButtonSize::Sm
                                                on:click=retry.clone()
                                            >
                                                "Retry"
                                            </Button>
                                        </AlertDescription>
                                    </Alert>
                                }
                            }
                        >
                            <Show
                                when=move || !notes.get().is_empty()
                                fallback=|| view! {
                                    <div class="py-12 text-center text-sm text-muted-foreground">
                                        <p>"No notes yet."</p>
                                        <p class="mt-1">
                                            <a class="text-primary underline underline-offset-4" href="/new">
                                                "Write your first note"
                                            </a>
                                        </p>
                                    </div>
                                }
                            >
                                <Show
                                    when=move || !filtered.get().is_empty()
                                    fallback=|| view! {
                                        <div class="py-12 text-center text-sm text-muted-foreground">
                                            "No notes match your search or category."
                                        </div>
                                    }
                                >
                                    <div class="grid gap-4 sm:grid-cols-2 lg:grid-cols-3">
                                        {move || {
                                            filtered
                                                .get()
                                                .into_iter()
                                                .map(|note| view! { <NoteCard note=note menu_open_id=menu_open_id /> })
                                                .collect_view()
                                        }}
                                    </div>
                                </Show>
                            </Show>
                        </Show>
                    </Show>
                </main>
            </div>
        </div>
    }
}

/// Shared create/update form, including the two AI actions.
#[component]
fn NoteEditor(
    heading: &'static str,
    save_label: &'static str,
    title: RwSignal<String>,
    content: RwSignal<String>,
    category: RwSignal<String>,
    summary: RwSignal<Option<String>>,
    saving: RwSignal<bool>,
    error: RwSignal<Option<String>>,
    #[prop(into)] on_save: Callback<SaveNoteRequest>,
) -> impl IntoView {
    let app_state = expect_context::<AppContext>();

    let suggesting: RwSignal<bool> = RwSignal::new(false);
    let summarizing: RwSignal<bool> = RwSignal::new(false);

    let busy = move || saving.get() || suggesting.get() || summarizing.get();
    let content_empty = move || content.get().trim().is_empty();

    let on_suggest_title = move |_| {
        let api_client = app_state.0.api_client.get_untracked();
        let content_val = content.get_untracked();

        suggesting.set(true);
        error.set(None);

        spawn_local(async move {
            match api_client.suggest_title(&content_val).await {
                Ok(t) if !t.trim().is_empty() => title.set(t),
                Ok(_) => error.set(Some("The AI didn't come up with a title.".to_string())),
                Err(e) => error.set(Some(e.to_string())),
            }
            suggesting.set(false);
        });
    };

    let on_summarize = move |_| {
        let api_client = app_state.0.api_client.get_untracked();
        let content_val = content.get_untracked();

        summarizing.set(true);
        error.set(None);

        spawn_local(async move {
            match api_client.summarize(&content_val).await {
                Ok(s) if !s.trim().is_empty() => {
                    // Keep the synopsis on the record AND append it to the
                    // body, the way saved notes render it.
                    content.set(append_summary_block(&content_val, &s));
                    summary.set(Some(s));
                }
                Ok(_) => error.set(Some("The AI didn't produce a summary.".to_string())),
                Err(e) => error.set(Some(e.to_string())),
            }
            summarizing.set(false);
        });
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        match validate_note_form(
            &title.get_untracked(),
            &content.get_untracked(),
            &category.get_untracked(),
            summary.get_untracked(),
        ) {
            Ok(req) => {
                error.set(None);
                on_save.run(req);
            }
            Err(e) => error.set(Some(e)),
        }
    };

    view! {
        <div class="mx-auto w-full max-w-3xl px-4 py-8">
            <div class="mb-6 flex items-center justify-between">
                <a href="/" class="text-sm text-muted-foreground hover:text-foreground">"← Back"</a>
                <h2 class="text-lg font-semibold">{heading}</h2>
                <span class="w-12"></span>
            </div>

            <Card>
                <CardContent>
                    <form class="flex flex-col gap-4" on:submit=on_submit>
                        <div class="flex flex-col gap-1.5">
                            <div class="flex items-center justify-between">
                                <Label html_for="title" class="text-xs">"Title"</Label>
                                <Button
                                    variant=ButtonVariant::Outline
                                    size=ButtonSize::Sm
                                    attr:r#type="button"
                                    attr:disabled=move || busy() || content_empty()
                                    on:click=on_suggest_title
                                >
                                    <span class="inline-flex items-center gap-2">
                                        <Show when=move || suggesting.get() fallback=|| ().into_view()>
                                            <Spinner />
                                        </Show>
                                        "Suggest title"
                                    </span>
                                </Button>
                            </div>
                            <Input
                                id="title"
                                placeholder="Give your note a title"
                                bind_value=title
                            />
                        </div>

                        <div class="flex flex-col gap-1.5">
                            <Label html_for="category" class="text-xs">"Category"</Label>
                            <Select id="category" bind_value=category>
                                <option value="" disabled=true>"Pick a category"</option>
                                {Category::iter()
                                    .map(|c| {
                                        let v = c.to_string();
                                        view! { <option value=v.clone()>{v.clone()}</option> }
                                    })
                                    .collect_view()}
                            </Select>
                        </div>

                        <div class="flex flex-col gap-1.5">
                            <div class="flex items-center justify-between">
                                <Label html_for="content" class="text-xs">"Content"</Label>
                                <Button
                                    variant=ButtonVariant::Outline
                                    size=ButtonSize::Sm
                                    attr:r#type="button"
                                    attr:disabled=move || busy() || content_empty()
                                    on:click=on_summarize
                                >
                                    <span class="inline-flex items-center gap-2">
                                        <Show when=move || summarizing.get() fallback=|| ().into_view()>
                                            <Spinner />
                                        </Show>
                                        "Summarize"
                                    </span>
                                </Button>
                            </div>
                            <Textarea
                                id="content"
                                placeholder="Write your note..."
                                rows=14
                                bind_value=content
                            />
                        </div>

                        <Show when=move || error.get().is_some() fallback=|| ().into_view()>
                            {move || {
                                error.get().map(|e| view! {
                                    <Alert class="border-destructive/30">
                                        <AlertDescription class="text-destructive text-xs">{e}</AlertDescription>
                                    </Alert>
                                })
                            }}
                        </Show>

                        <Button class="w-full" attr:disabled=busy>
                            <span class="inline-flex items-center gap-2">
                                <Show when=move || saving.get() fallback=|| ().into_view()>
                                    <Spinner />
                                </Show>
                                {move || if saving.get() { "Saving..." } else { save_label }}
                            </span>
                        </Button>
                    </form>
                </CardContent>
            </Card>
        </div>
    }
}

#[component]
pub fn NewNotePage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let navigate = StoredValue::new(use_navigate());

    let title: RwSignal<String> = RwSignal::new(String::new());
    let content: RwSignal<String> = RwSignal::new(String::new());
    let category: RwSignal<String> = RwSignal::new(String::new());
    let summary: RwSignal<Option<String>> = RwSignal::new(None);
    let saving: RwSignal<bool> = RwSignal::new(false);
    let error: RwSignal<Option<String>> = RwSignal::new(None);

    let on_save = Callback::new(move |req: SaveNoteRequest| {
        let api_client = app_state.0.api_client.get_untracked();
        let app_state = app_state.clone();

        saving.set(true);

        spawn_local(async move {
            match api_client.create_note(&req).await {
                Ok(note) => {
                    // Local insert so the dashboard shows the note at once;
                    // its reload remains the authority.
                    app_state.0.notes.update(|cache| cache.upsert(note));
                    navigate.with_value(|nav| nav("/", Default::default()));
                }
                Err(e) => {
                    error.set(Some(e.to_string()));
                }
            }
            saving.set(false);
        });
    });

    view! {
        <div class="min-h-screen bg-background text-foreground">
            <NoteEditor
                heading="New note"
                save_label="Save note"
                title=title
                content=content
                category=category
                summary=summary
                saving=saving
                error=error
                on_save=on_save
            />
        </div>
    }
}

#[component]
pub fn EditNotePage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let params = use_params_map();
    let navigate = StoredValue::new(use_navigate());

    let note_id = move || params.with(|p| p.get("id").unwrap_or_default());

    let title: RwSignal<String> = RwSignal::new(String::new());
    let content: RwSignal<String> = RwSignal::new(String::new());
    let category: RwSignal<String> = RwSignal::new(String::new());
    let summary: RwSignal<Option<String>> = RwSignal::new(None);
    let saving: RwSignal<bool> = RwSignal::new(false);
    let error: RwSignal<Option<String>> = RwSignal::new(None);

    let loading: RwSignal<bool> = RwSignal::new(true);
    let load_error: RwSignal<Option<String>> = RwSignal::new(None);

    let fill = move |n: &Note| {
        title.set(n.title.clone());
        content.set(n.content.clone());
        category.set(n.category.map(|c| c.to_string()).unwrap_or_default());
        summary.set(n.summary.clone());
    };

    {
        let app_state = app_state.clone();
        Effect::new(move |_| {
            let id = note_id();
            if id.trim().is_empty() {
                return;
            }

            // Cache first; deep links fall back to a single-note fetch.
            if let Some(n) = app_state.0.notes.get_untracked().get(&id) {
                fill(n);
                loading.set(false);
                return;
            }

            let api_client = app_state.0.api_client.get_untracked();
            spawn_local(async move {
                match api_client.get_note(&id).await {
                    Ok(n) => fill(&n),
                    Err(e) => load_error.set(Some(e.to_string())),
                }
                loading.set(false);
            });
        });
    }

    let on_save = Callback::new(move |req: SaveNoteRequest| {
        let id = note_id();
        let api_client = app_state.0.api_client.get_untracked();
        let app_state = app_state.clone();

        saving.set(true);

        spawn_local(async move {
            match api_client.update_note(&id, &req).await {
                Ok(note) => {
                    let href = note_href(&note.id);
                    app_state.0.notes.update(|cache| cache.upsert(note));
                    navigate.with_value(|nav| nav(&href, Default::default()));
                }
                Err(e) => {
                    error.set(Some(e.to_string()));
                }
            }
            saving.set(false);
        });
    });

    view! {
        <div class="min-h-screen bg-background text-foreground">
            <Show
                when=move || !loading.get()
                fallback=|| view! {
                    <div class="flex items-center justify-center gap-2 py-16 text-sm text-muted-foreground">
                        <Spinner />
                        "Loading note..."
                    </div>
                }
            >
                <Show
                    when=move || load_error.get().is_none()
                    fallback=move || view! {
                        <div class="mx-auto w-full max-w-3xl px-4 py-8">
                            <Alert class="border-destructive/30">
                                <AlertDescription class="text-destructive text-sm">
                                    {move || load_error.get().unwrap_or_default()}
                                </AlertDescription>
                            </Alert>
                        </div>
                    }
                >
                    <NoteEditor
                        heading="Edit note"
                        save_label="Save changes"
                        title=title
                        content=content
                        category=category
                        summary=summary
                        saving=saving
                        error=error
                        on_save=on_save
                    />
                </Show>
            </Show>
        </div>
    }
}

#[component]
pub fn NoteViewPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let params = use_params_map();

    let note_id = move || params.with(|p| p.get("id").unwrap_or_default());

    let note: RwSignal<Option<Note>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(true);
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let not_found: RwSignal<bool> = RwSignal::new(false);

    {
        let app_state = app_state.clone();
        Effect::new(move |_| {
            let id = note_id();
            if id.trim().is_empty() {
                return;
            }

            if let Some(n) = app_state.0.notes.get_untracked().get(&id) {
                note.set(Some(n.clone()));
                loading.set(false);
                return;
            }

            let api_client = app_state.0.api_client.get_untracked();
            spawn_local(async move {
                match api_client.get_note(&id).await {
                    Ok(n) => note.set(Some(n)),
                    Err(e) if e.kind == ApiErrorKind::Http && e.status == Some(404) => {
                        not_found.set(true);
                    }
                    Err(e) => error.set(Some(e.to_string())),
                }
                loading.set(false);
            });
        });
    }

    let edit_link = move || note.get().map(|n| edit_href(&n.id)).unwrap_or_default();

    view! {
        <div class="min-h-screen bg-background text-foreground">
            <div class="mx-auto w-full max-w-3xl px-4 py-8">
                <div class="mb-6 flex items-center justify-between">
                    <a href="/" class="text-sm text-muted-foreground hover:text-foreground">"← Back to dashboard"</a>

                    <Show when=move || note.get().is_some() fallback=|| ().into_view()>
                        <a
                            class="inline-flex h-8 items-center gap-1.5 rounded-md border bg-border/30 px-3 text-sm font-medium shadow-xs hover:bg-border/50"
                            href=edit_link
                        >
                            <svg xmlns="http://www.w3.org/2000/svg" width="14" height="14" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" aria-hidden="true">
                                <path d="M12 20h9" />
                                <path d="M16.5 3.5a2.121 2.121 0 0 1 3 3L7 19l-4 1 1-4Z" />
                            </svg>
                            "Edit"
                        </a>
                    </Show>
                </div>

                <Show
                    when=move || !loading.get()
                    fallback=|| view! {
                        <div class="flex items-center justify-center gap-2 py-16 text-sm text-muted-foreground">
                            <Spinner />
                            "Loading note..."
                        </div>
                    }
                >
                    <Show
                        when=move || !not_found.get()
                        fallback=|| view! {
                            <div class="py-16 text-center text-sm text-muted-foreground">
                                "Note not found."
                            </div>
                        }
                    >
                        <Show
                            when=move || error.get().is_none()
                            fallback=move || view! {
                                <Alert class="border-destructive/30">
                                    <AlertDescription class="text-destructive text-sm">
                                        {move || error.get().unwrap_or_default()}
                                    </AlertDescription>
                                </Alert>
                            }
                        >
                            {move || {
                                note.get().map(|n| {
                                    let summary = n.summary.clone().unwrap_or_default();
                                    let has_summary = !summary.trim().is_empty();
                                    view! {
                                        <article class="space-y-6">
                                            <header class="space-y-2">
                                                <h1 class="text-3xl font-bold">{n.title.clone()}</h1>
                                                <div class="flex items-center gap-3 text-sm text-muted-foreground">
                                                    <Badge class=category_badge_class(n.category)>
                                                        {category_label(n.category)}
                                                    </Badge>
                                                    <span>"Created on " {format_created_at(&n.created_at)}</span>
                                                </div>
                                            </header>

                                            <Show when=move || has_summary fallback=|| ().into_view()>
                                                <Card class="gap-2 border-primary/30 py-4">
                                                    <CardHeader class="px-4">
                                                        <Badge class="bg-primary text-primary-foreground">"AI Summary"</Badge>
                                                    </CardHeader>
                                                    <CardContent class="px-4">
                                                        <p class="text-sm leading-relaxed">{summary.clone()}</p>
                                                    </CardContent>
                                                </Card>
                                            </Show>

                                            <div class="whitespace-pre-line rounded-xl border p-6 text-sm leading-relaxed">
                                                {n.content.clone()}
                                            </div>
                                        </article>
                                    }
                                })
                            }}
                        </Show>
                    </Show>
                </Show>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_note_form_requires_everything() {
        assert!(validate_note_form("", "body", "Work", None).is_err());
        assert!(validate_note_form("t", "   ", "Work", None).is_err());
        assert!(validate_note_form("t", "body", "", None).is_err());
        assert!(validate_note_form("t", "body", "NotACategory", None).is_err());
    }

    #[test]
    fn test_validate_note_form_builds_request() {
        let req = validate_note_form("  Trip  ", "beach", "Personal", Some("  ".to_string()))
            .expect("valid form");
        assert_eq!(req.title, "Trip");
        assert_eq!(req.category, Some(Category::Personal));
        // Blank summaries are dropped rather than stored.
        assert!(req.summary.is_none());
    }

    #[test]
    fn test_note_hrefs_encode_ids() {
        assert_eq!(note_href("a/b"), "/note/a%2Fb");
        assert_eq!(edit_href("a b"), "/note/a%20b/edit");
    }

    #[test]
    fn test_category_label_fallback() {
        assert_eq!(category_label(Some(Category::Ideas)), "Ideas");
        assert_eq!(category_label(None), "Uncategorized");
    }
}
