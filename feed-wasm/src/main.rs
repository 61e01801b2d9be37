use crate::client::FeedClientWeb;
use dioxus::prelude::*;
use feed_client::listing::{post_count_label, PostsListState};
use feed_client::models::{PaginationState, Post, PostsQuery, UserSearchQuery, UserSearchResult};
use feed_client::page_window::{page_window, PageSlot};
use feed_client::search::{SearchController, SearchView, DEBOUNCE_MS, HINT_TEXT, NO_RESULTS_TEXT};
use feed_client::FeedApi;
use gloo_timers::future::TimeoutFuture;

mod client;

const BASE_URL: &str = "http://127.0.0.1:8080";
const EXCERPT_CHARS: usize = 120;

#[derive(Clone, Routable, Debug, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(Navbar)]
        #[redirect("/", || Route::Posts { page: 1 })]
        #[route("/posts?:page")]
        Posts { page: u64 },
        #[route("/posts/:id")]
        PostDetail { id: i64 },
}

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    dioxus::launch(App);
}

fn api() -> FeedClientWeb {
    FeedClientWeb::new(BASE_URL)
}

/// Wall clock for the search cache. `std::time::Instant` is unavailable on wasm32.
fn now_ms() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default()
}

#[component]
fn App() -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        Router::<Route> {}
    }
}

#[component]
fn Navbar() -> Element {
    rsx! {
        nav { class: "navbar",
            Link { to: Route::Posts { page: 1 }, "Community Feed" }
        }
        Outlet::<Route> {}
    }
}

/// `page` comes from the query string; a missing or zero value means 1.
#[component]
fn Posts(page: u64) -> Element {
    let navigator = use_navigator();
    let page = page.max(1);
    let mut filter = use_signal(|| PostsListState::new(page));

    use_effect(use_reactive!(|page| {
        if filter.peek().page() != page {
            filter.write().set_page(page);
        }
    }));

    let mut posts = use_resource(move || async move {
        let query = {
            let state = filter.read();
            PostsQuery {
                page: Some(state.page()),
                page_size: None,
                author_id: state.author_id(),
            }
        };
        api().list_posts(&query).await
    });

    let on_select = move |user: UserSearchResult| {
        let target = filter.write().select_user(user);
        if let Some(page) = target {
            navigator.push(Route::Posts { page });
        }
    };

    let selected = filter.read().selected_user().cloned();

    rsx! {
        div { class: "container",
            h1 { "Posts" }

            UserFilter {
                selected,
                on_select,
                on_clear: move |_| filter.write().clear_user(),
            }

            match posts.read().as_ref() {
                Some(Ok(page)) if !page.items.is_empty() => rsx! {
                    div { class: "post-grid",
                        for post in page.items.iter() {
                            PostCard {
                                key: "{post.id}",
                                post: post.clone(),
                                on_deleted: move |_| posts.restart(),
                            }
                        }
                    }
                    Pagination {
                        pagination: page.pagination,
                        on_page: move |page| {
                            navigator.push(Route::Posts { page });
                        },
                    }
                },
                Some(Ok(_)) => rsx! { p { class: "meta", "No posts found." } },
                Some(Err(e)) => rsx! { ErrorBanner { message: e.to_string() } },
                None => rsx! { p { class: "meta", "Loading posts..." } },
            }
        }
    }
}

#[component]
fn UserFilter(
    selected: Option<UserSearchResult>,
    on_select: EventHandler<UserSearchResult>,
    on_clear: EventHandler<()>,
) -> Element {
    let mut search = use_signal(SearchController::new);

    let on_input = move |evt: FormEvent| {
        let ticket = search.write().input(evt.value());
        spawn(async move {
            TimeoutFuture::new(DEBOUNCE_MS).await;
            let Some(key) = search.write().settle(ticket, now_ms()) else {
                return;
            };
            let outcome = api()
                .search_users(&UserSearchQuery::first_page(key.query()))
                .await
                .map_err(|e| e.to_string());
            search.write().complete(&key, outcome, now_ms());
        });
    };

    let raw = search.read().raw_text().to_string();
    let dropdown = match search.read().view() {
        SearchView::Hint if raw.is_empty() => rsx! {},
        SearchView::Hint => rsx! { div { class: "dropdown", div { class: "status", "{HINT_TEXT}" } } },
        SearchView::Searching => rsx! { div { class: "dropdown", div { class: "status", "Searching..." } } },
        SearchView::Failed(message) => rsx! { div { class: "dropdown", div { class: "status", "{message}" } } },
        SearchView::NoResults => rsx! { div { class: "dropdown", div { class: "status", "{NO_RESULTS_TEXT}" } } },
        SearchView::Results(users) => rsx! {
            div { class: "dropdown", role: "listbox",
                for user in users.iter().cloned() {
                    div {
                        key: "{user.id}",
                        class: "option",
                        role: "option",
                        onclick: move |_| {
                            search.write().select();
                            on_select.call(user.clone());
                        },
                        span { "{user.name} (@{user.username})" }
                        span { class: "meta", "{post_count_label(user.post_count)}" }
                    }
                }
            }
        },
    };

    rsx! {
        div { class: "combobox",
            if let Some(user) = selected {
                div { class: "chip",
                    span { "Posts by {user.name}" }
                    button {
                        class: "btn",
                        onclick: move |_| on_clear.call(()),
                        "Clear"
                    }
                }
            }
            input {
                r#type: "text",
                placeholder: "Filter by user...",
                value: "{raw}",
                oninput: on_input,
            }
            {dropdown}
        }
    }
}

#[component]
fn PostCard(post: Post, on_deleted: EventHandler<()>) -> Element {
    let mut deleting = use_signal(|| false);
    let mut error = use_signal(|| None::<String>);
    let id = post.id;

    let on_delete = move |_| {
        deleting.set(true);
        spawn(async move {
            match api().delete_post(id).await {
                Ok(()) => on_deleted.call(()),
                Err(e) => {
                    error.set(Some(e.to_string()));
                    deleting.set(false);
                }
            }
        });
    };

    let excerpt: String = post.body.chars().take(EXCERPT_CHARS).collect();

    rsx! {
        article { class: "card",
            if let Some(message) = error() {
                ErrorBanner {
                    message,
                    on_dismiss: move |_| error.set(None),
                }
            }
            Link { to: Route::PostDetail { id },
                h2 { "{post.title}" }
            }
            p { class: "meta", "by {post.author.name}" }
            p { "{excerpt}" }
            button {
                class: "btn btn-danger",
                disabled: deleting(),
                onclick: on_delete,
                if deleting() { "Deleting..." } else { "Delete" }
            }
        }
    }
}

#[component]
fn ErrorBanner(message: String, on_dismiss: Option<EventHandler<()>>) -> Element {
    rsx! {
        div { class: "banner", role: "alert",
            span { "{message}" }
            if let Some(on_dismiss) = on_dismiss {
                button { onclick: move |_| on_dismiss.call(()), "×" }
            }
        }
    }
}

#[component]
fn Pagination(pagination: PaginationState, on_page: EventHandler<u64>) -> Element {
    let slots = page_window(pagination.page, pagination.total_pages);
    if slots.is_empty() {
        return rsx! {};
    }
    let current = pagination.page;

    rsx! {
        nav { class: "pagination",
            button {
                class: "btn",
                disabled: !pagination.has_previous_page,
                onclick: move |_| on_page.call(current.saturating_sub(1).max(1)),
                "Previous"
            }
            for (index, slot) in slots.into_iter().enumerate() {
                match slot {
                    PageSlot::Page(n) => rsx! {
                        button {
                            key: "{index}",
                            class: if n == current { "btn btn-active" } else { "btn" },
                            onclick: move |_| on_page.call(n),
                            "{n}"
                        }
                    },
                    PageSlot::Ellipsis => rsx! { span { key: "{index}", "…" } },
                }
            }
            button {
                class: "btn",
                disabled: !pagination.has_next_page,
                onclick: move |_| on_page.call(current + 1),
                "Next"
            }
        }
    }
}

#[component]
fn PostDetail(id: i64) -> Element {
    let navigator = use_navigator();
    let mut error = use_signal(|| None::<String>);

    let post = use_resource(move || async move { api().get_post(id).await });

    let on_delete = move |_| {
        spawn(async move {
            match api().delete_post(id).await {
                Ok(()) => {
                    navigator.push(Route::Posts { page: 1 });
                }
                Err(e) => error.set(Some(e.to_string())),
            }
        });
    };

    rsx! {
        article { class: "container",
            if let Some(message) = error() {
                ErrorBanner {
                    message,
                    on_dismiss: move |_| error.set(None),
                }
            }
            match post.read().as_ref() {
                Some(Ok(post)) => rsx! {
                    div { class: "card",
                        h1 { "{post.title}" }
                        p { class: "meta", "by {post.author.name} (@{post.author.username}) · {post.author.email}" }
                        p { style: "white-space: pre-wrap", "{post.body}" }
                        div { style: "display: flex; gap: 1rem; margin-top: 2rem",
                            Link { to: Route::Posts { page: 1 }, class: "btn", "Back to posts" }
                            button { class: "btn btn-danger", onclick: on_delete, "Delete" }
                        }
                    }
                },
                Some(Err(e)) => rsx! { ErrorBanner { message: e.to_string() } },
                None => rsx! { p { class: "meta", "Loading..." } },
            }
        }
    }
}
