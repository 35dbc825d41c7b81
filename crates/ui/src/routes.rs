use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::context::AppContext;
use crate::views::{AssessmentView, HomeView, ResultsView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", HomeView)] Home {},
        #[route("/assessment/:project_id", AssessmentView)] Assessment { project_id: u64 },
        #[route("/results/:submission_id", ResultsView)] Results { submission_id: u64 },
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Header {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Header() -> Element {
    let ctx = use_context::<AppContext>();
    let project_id = ctx.project_id().value();

    rsx! {
        header { class: "topbar",
            h1 { "SDG Self-Assessment" }
            nav {
                Link { to: Route::Home {}, "Overview" }
                Link { to: Route::Assessment { project_id }, "Assessment" }
            }
        }
    }
}
