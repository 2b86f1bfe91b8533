//! The gated parts of the TaskDeck shell: sidebar links and action buttons.

use std::io::{self, Write};
use std::sync::Arc;

use taskdeck_auth::{Action, IdentitySignal, PermissionEvaluator, Resource, SessionStore};
use taskdeck_gate::{
    CanAccess, ProtectedAction, ProtectedActionContainer, ProtectedActionContainerView,
    ProtectedActionView, Render,
};

use crate::script::Step;

type Evaluator = PermissionEvaluator<Arc<IdentitySignal>>;

const NAVIGATION: [(&str, Resource, Action); 5] = [
    ("Dashboard", Resource::Task, Action::Read),
    ("My Tasks", Resource::Task, Action::Read),
    ("New Task", Resource::Task, Action::Create),
    ("Projects", Resource::Project, Action::Read),
    ("Team", Resource::Team, Action::Read),
];

/// Session plus every mounted gate of the shell.
pub struct Shell {
    session: SessionStore,
    evaluator: Evaluator,
    nav: Vec<ProtectedActionView<&'static str>>,
    settings: CanAccess<Arc<IdentitySignal>, &'static str>,
    delete_task: ProtectedActionContainerView<&'static str>,
    export_project: ProtectedActionView<&'static str>,
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}

fn describe(render: Render<'_, &'static str>) -> &'static str {
    match render {
        Render::Content(label) | Render::Denied(label) => *label,
        Render::DefaultNotice(notice) => notice,
        Render::Nothing => "(hidden)",
    }
}

fn link_line(out: &mut impl Write, label: &str, visible: bool) -> io::Result<()> {
    writeln!(out, "  {} {}", if visible { '+' } else { '-' }, label)
}

impl Shell {
    /// A shell over a signed-out session.
    pub fn new() -> Self {
        Self::with_session(SessionStore::new())
    }

    pub fn with_session(session: SessionStore) -> Self {
        let evaluator = PermissionEvaluator::new(session.signal());

        let nav = NAVIGATION
            .into_iter()
            .map(|(label, resource, action)| {
                ProtectedAction::for_permission(resource, action, label).mount(&evaluator)
            })
            .collect();
        let settings = CanAccess::mount(
            evaluator.clone(),
            Some(Resource::Settings),
            Some(Action::Read),
            "Settings",
        );
        let delete_task =
            ProtectedActionContainer::for_permission(Resource::Task, Action::Delete, "Delete task")
                .denied("Delete task (no permission)")
                .mount(&evaluator);
        let export_project =
            ProtectedAction::for_permission(Resource::Project, Action::Export, "Export project")
                .show_fallback(true)
                .mount(&evaluator);

        Self {
            session,
            evaluator,
            nav,
            settings,
            delete_task,
            export_project,
        }
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn apply(&mut self, step: Step, out: &mut impl Write) -> anyhow::Result<()> {
        match step {
            Step::Login { response } => match self.session.sign_in(response) {
                Ok(identity) => writeln!(
                    out,
                    "> signed in as {} ({})",
                    identity.display_name(),
                    identity.resolved_role()
                )?,
                Err(err) => writeln!(out, "> sign-in failed: {}", err)?,
            },
            Step::Refresh { user } => match self.session.replace_identity(user) {
                Ok(identity) => writeln!(
                    out,
                    "> identity replaced: {} ({})",
                    identity.display_name(),
                    identity.resolved_role()
                )?,
                Err(err) => writeln!(out, "> refresh failed: {}", err)?,
            },
            Step::Logout => {
                self.session.sign_out()?;
                writeln!(out, "> signed out")?;
            }
            Step::Check { resource, action } => {
                let allowed = self.evaluator.has_permission_named(&resource, &action);
                writeln!(
                    out,
                    "> {}:{} = {}",
                    resource,
                    action,
                    if allowed { "allowed" } else { "denied" }
                )?;
            }
            Step::Explain { resource, action } => {
                let explanation = self.evaluator.explain(resource, action);
                writeln!(out, "> explain {}", serde_json::to_string(&explanation)?)?;
            }
            Step::Show => self.render(out)?,
        }

        self.refresh(out)?;
        Ok(())
    }

    /// Poll every gate and print the ones whose output changed.
    fn refresh(&mut self, out: &mut impl Write) -> io::Result<()> {
        for (view, (label, _, _)) in self.nav.iter_mut().zip(NAVIGATION) {
            if view.poll() {
                link_line(out, label, view.is_allowed())?;
            }
        }
        if self.settings.poll() {
            link_line(out, "Settings", !self.settings.render().is_nothing())?;
        }
        if self.delete_task.poll() {
            writeln!(out, "  ~ Delete task -> {}", describe(self.delete_task.render()))?;
        }
        if self.export_project.poll() {
            writeln!(out, "  ~ Export project -> {}", describe(self.export_project.render()))?;
        }
        Ok(())
    }

    /// Print the role badge and every gate.
    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        match self.evaluator.current_role() {
            Some(role) => writeln!(out, "role: {} - {}", role, role.description())?,
            None => writeln!(out, "role: signed out")?,
        }
        for (view, (label, _, _)) in self.nav.iter().zip(NAVIGATION) {
            link_line(out, label, view.is_allowed())?;
        }
        link_line(out, "Settings", !self.settings.render().is_nothing())?;
        writeln!(out, "  ~ Delete task -> {}", describe(self.delete_task.render()))?;
        writeln!(out, "  ~ Export project -> {}", describe(self.export_project.render()))?;
        Ok(())
    }
}
