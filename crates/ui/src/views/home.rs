use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{SubmissionCardVm, map_submission_cards};

const RECENT_LIMIT: u32 = 10;

#[derive(Clone, Debug, PartialEq)]
struct HomeData {
    cards: Vec<SubmissionCardVm>,
}

#[component]
pub fn HomeView() -> Element {
    let ctx = use_context::<AppContext>();
    let results = ctx.results();
    let project_id = ctx.project_id();

    let resource = use_resource(move || {
        let results = results.clone();
        async move {
            let items = results
                .recent(project_id, RECENT_LIMIT)
                .await
                .map_err(|_| ViewError::Unknown)?;
            Ok(HomeData {
                cards: map_submission_cards(&items),
            })
        }
    });

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page home",
            section { class: "intro",
                h2 { "Project {project_id}" }
                p {
                    "Rate the project against the Sustainable Development Goals. "
                    "Answers are saved as you go and scored when you submit."
                }
                Link {
                    class: "btn btn-primary",
                    to: Route::Assessment { project_id: project_id.value() },
                    "Start assessment"
                }
            }

            section { class: "recent",
                h3 { "Recent submissions" }
                match state {
                    ViewState::Idle => rsx! {
                        p { "Idle" }
                    },
                    ViewState::Loading => rsx! {
                        p { "Loading..." }
                    },
                    ViewState::Ready(data) => rsx! {
                        if data.cards.is_empty() {
                            p { class: "empty", "No submissions yet." }
                        } else {
                            ul { class: "submission-list",
                                for card in data.cards {
                                    SubmissionCard { key: "{card.id}", card }
                                }
                            }
                        }
                    },
                    ViewState::Error(err) => rsx! {
                        p { class: "error", "{err.message()}" }
                    },
                }
            }
        }
    }
}

#[component]
fn SubmissionCard(card: SubmissionCardVm) -> Element {
    rsx! {
        li {
            Link { class: "submission-link", to: Route::Results { submission_id: card.id.value() },
                span { class: "submission-date", "{card.submitted_at_str}" }
                span { class: "submission-score", "{card.overall_str} / 10" }
                span { class: "badge {card.badge_class}", "{card.level}" }
            }
        }
    }
}
