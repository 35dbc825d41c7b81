use dioxus::prelude::*;
use dioxus_router::use_navigator;

use sdg_core::{EVIDENCE_MAX_LEN, EvidenceMeter, FieldKind};
use sdg_core::model::{GoalId, ProjectId};
use services::SaveStatus;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{
    AssessmentIntent, AssessmentOutcome, AssessmentVm, FieldVm, SectionVm, StepVm,
    map_save_status, start_assessment,
};

#[component]
pub fn AssessmentView(project_id: u64) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let assessments = ctx.assessments();
    let project = ProjectId::new(project_id);

    let error = use_signal(|| None::<ViewError>);
    let vm = use_signal(|| None::<AssessmentVm>);
    let busy = use_signal(|| false);
    let save_status = use_signal(SaveStatus::default);

    let assessments_for_resource = assessments.clone();
    let resource = use_resource(move || {
        let assessments = assessments_for_resource.clone();
        let mut vm = vm;
        let mut error = error;
        async move {
            let started = start_assessment(&assessments, project).await?;
            vm.set(Some(started));
            error.set(None);
            Ok::<_, ViewError>(())
        }
    });

    let autosaver = assessments.autosaver();
    use_future(move || {
        let mut status = autosaver.subscribe();
        let mut save_status = save_status;
        async move {
            save_status.set(*status.borrow_and_update());
            while status.changed().await.is_ok() {
                let current = *status.borrow_and_update();
                save_status.set(current);
            }
        }
    });

    let dispatch_intent = {
        let assessments = assessments.clone();
        use_callback(move |intent: AssessmentIntent| {
            let mut error = error;
            let mut vm = vm;
            let mut busy = busy;

            if intent.is_edit() {
                let result = match vm.write().as_mut() {
                    Some(vm) => vm.apply_edit(&assessments, intent),
                    None => Err(ViewError::Unknown),
                };
                if let Err(err) = result {
                    error.set(Some(err));
                }
                return;
            }
            if busy() {
                return;
            }

            let assessments = assessments.clone();
            spawn(async move {
                busy.set(true);
                let taken = vm.write().take();
                let Some(mut vm_value) = taken else {
                    busy.set(false);
                    error.set(Some(ViewError::Unknown));
                    return;
                };

                let result = vm_value.navigate(&assessments, intent).await;

                // The form goes back even on error so edits are never lost.
                vm.set(Some(vm_value));
                busy.set(false);

                match result {
                    Ok(AssessmentOutcome::Submitted(id)) => {
                        error.set(None);
                        navigator.push(Route::Results {
                            submission_id: id.value(),
                        });
                    }
                    Ok(AssessmentOutcome::Continue | AssessmentOutcome::Blocked) => {
                        error.set(None);
                    }
                    Err(err) => error.set(Some(err)),
                }
            });
        })
    };

    let state = view_state_from_resource(&resource);
    let step = vm.read().as_ref().map(AssessmentVm::step_view);
    let restored = vm.read().as_ref().map_or(0, AssessmentVm::restored_fields);
    let status_line = map_save_status(save_status()).map(|line| {
        let class = if line.warning {
            "save-status warning"
        } else {
            "save-status"
        };
        (class, line.text)
    });

    rsx! {
        div { class: "page assessment",
            h2 { "Self-assessment" }

            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "error", "{err.message()}" }
                },
                ViewState::Ready(()) => match step {
                    Some(step) => rsx! {
                        if restored > 0 {
                            p { class: "alert alert-info", "Your saved answers have been restored." }
                        }
                        if let Some(err) = error() {
                            p { class: "alert alert-danger", "{err.message()}" }
                        }
                        StepForm { step, busy: busy(), on_intent: dispatch_intent }
                        if let Some((class, text)) = status_line {
                            p { class, "{text}" }
                        }
                    },
                    None => rsx! {
                        p { "Loading..." }
                    },
                },
            }
        }
    }
}

#[component]
fn StepForm(step: StepVm, busy: bool, on_intent: Callback<AssessmentIntent>) -> Element {
    let submitted = step.submitted;
    let position = format!("Step {} of {}", step.index + 1, step.count);

    rsx! {
        div { class: "progress-block",
            div { class: "progress",
                div {
                    class: "progress-bar {step.tone_class}",
                    style: "width: {step.percent}%",
                    "{step.percent}%"
                }
            }
            ol { class: "step-links",
                for link in step.links.clone() {
                    li { key: "{link.index}",
                        button {
                            r#type: "button",
                            class: step_link_class(link.current, link.complete),
                            disabled: busy || submitted,
                            onclick: move |_| on_intent.call(AssessmentIntent::GoTo(link.index)),
                            "{link.label}"
                        }
                    }
                }
            }
            p { class: "step-position", "{position}" }
        }

        if let Some(notice) = step.notice {
            div { class: "alert alert-warning", role: "alert", "{notice}" }
        }

        for section in step.sections.clone() {
            SectionCard { key: "{section.goal}", section, disabled: submitted, on_intent }
        }

        div { class: "form-actions",
            if !step.is_first {
                button {
                    r#type: "button",
                    class: "btn btn-secondary",
                    disabled: busy || submitted,
                    onclick: move |_| on_intent.call(AssessmentIntent::Prev),
                    "Previous"
                }
            }
            if step.is_last {
                button {
                    r#type: "button",
                    class: "btn btn-success",
                    disabled: busy || submitted,
                    onclick: move |_| on_intent.call(AssessmentIntent::Submit),
                    "Submit assessment"
                }
            } else {
                button {
                    r#type: "button",
                    class: "btn btn-primary",
                    disabled: busy || submitted,
                    onclick: move |_| on_intent.call(AssessmentIntent::Next),
                    "Next"
                }
            }
        }
    }
}

fn step_link_class(current: bool, complete: bool) -> &'static str {
    if current {
        "step-link current"
    } else if complete {
        "step-link complete"
    } else {
        "step-link"
    }
}

#[component]
fn SectionCard(section: SectionVm, disabled: bool, on_intent: Callback<AssessmentIntent>) -> Element {
    let goal = section.goal;
    let class = if section.has_errors {
        "sdg-section has-errors"
    } else {
        "sdg-section"
    };
    rsx! {
        section {
            class,
            style: "border-left-color: {section.color}",
            h3 { "{section.title}" }
            p { class: "prompt", "{section.prompt}" }
            for field in section.fields.clone() {
                FieldControl { key: "{field.name}", goal, field, disabled, on_intent }
            }
        }
    }
}

#[component]
fn FieldControl(
    goal: GoalId,
    field: FieldVm,
    disabled: bool,
    on_intent: Callback<AssessmentIntent>,
) -> Element {
    let name = field.name.clone();
    let class = if field.missing { "field is-invalid" } else { "field" };
    let max_len = field.meter.map_or(EVIDENCE_MAX_LEN, |meter| meter.max_len);

    let control = match field.kind {
        FieldKind::SingleChoice => rsx! {
            for option in field.options.clone() {
                label { key: "{option.value}", class: "choice",
                    input {
                        r#type: "radio",
                        name: "{name}",
                        value: "{option.value}",
                        checked: option.checked,
                        disabled,
                        onchange: {
                            let field = name.clone();
                            let value = option.value.clone();
                            move |_| on_intent.call(AssessmentIntent::Choose {
                                goal,
                                field: field.clone(),
                                value: value.clone(),
                            })
                        },
                    }
                    " {option.label}"
                }
            }
        },
        FieldKind::MultiChoice => rsx! {
            for option in field.options.clone() {
                label { key: "{option.value}", class: "choice",
                    input {
                        r#type: "checkbox",
                        name: "{name}",
                        value: "{option.value}",
                        checked: option.checked,
                        disabled,
                        onchange: {
                            let field = name.clone();
                            let value = option.value.clone();
                            move |evt: FormEvent| on_intent.call(AssessmentIntent::Toggle {
                                goal,
                                field: field.clone(),
                                option: value.clone(),
                                checked: evt.checked(),
                            })
                        },
                    }
                    " {option.label}"
                }
            }
        },
        FieldKind::Toggle => {
            let checked = field.flag;
            rsx! {
                label { class: "choice",
                    input {
                        r#type: "checkbox",
                        name: "{name}",
                        checked,
                        disabled,
                        onchange: {
                            let field = name.clone();
                            move |evt: FormEvent| on_intent.call(AssessmentIntent::Toggle {
                                goal,
                                field: field.clone(),
                                option: String::new(),
                                checked: evt.checked(),
                            })
                        },
                    }
                    " Yes"
                }
            }
        }
        FieldKind::FreeText => rsx! {
            textarea {
                name: "{name}",
                rows: 3,
                maxlength: "{max_len}",
                value: "{field.text}",
                disabled,
                oninput: {
                    let field = name.clone();
                    move |evt: FormEvent| on_intent.call(AssessmentIntent::Text {
                        goal,
                        field: field.clone(),
                        text: evt.value(),
                    })
                },
            }
            if let Some(meter) = field.meter {
                EvidenceMeterBar { meter }
            }
        },
    };

    rsx! {
        div { class,
            p { class: "field-label",
                "{field.label}"
                if field.required {
                    span { class: "required", " *" }
                }
            }
            {control}
            if field.missing {
                p { class: "invalid-feedback", "This field is required." }
            }
        }
    }
}

#[component]
fn EvidenceMeterBar(meter: EvidenceMeter) -> Element {
    let quality = meter.quality;
    rsx! {
        div { class: "evidence-quality",
            span { class: "char-count", "{meter.count}/{meter.max_len}" }
            div { class: "evidence-meter",
                div {
                    class: "evidence-level {quality.css_class()}",
                    style: "width: {meter.percent()}%",
                }
            }
            span { class: "evidence-text", "Evidence strength: {quality.label()}" }
        }
    }
}
