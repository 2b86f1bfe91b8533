//! Gates driven by a real session: sign-in, role change, sign-out, unmount.

use std::io;
use std::sync::{Arc, Mutex};

use serde_json::json;

use taskdeck_auth::{Action, AuthResponse, PermissionEvaluator, Resource, SessionStore};
use taskdeck_gate::{
    CanAccess, DEFAULT_DENIED_NOTICE, Decision, GateState, ProtectedAction,
    ProtectedActionContainer, Render,
};

fn login(role: &str) -> AuthResponse {
    serde_json::from_value(json!({
        "success": true,
        "message": "ok",
        "data": {
            "id": "123e4567-e89b-12d3-a456-426614174002",
            "email": "mike@example.com",
            "firstName": "Mike",
            "lastName": "Chen",
            "role": role,
            "token": "t"
        }
    }))
    .unwrap()
}

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

#[test]
fn every_shape_follows_the_session() {
    let session = SessionStore::new();
    let evaluator = PermissionEvaluator::new(session.signal());

    let mut delete_button =
        ProtectedAction::for_permission(Resource::Task, Action::Delete, "delete")
            .show_fallback(true)
            .mount(&evaluator);
    let mut export =
        ProtectedActionContainer::for_permission(Resource::Project, Action::Export, "export")
            .denied("export-disabled")
            .mount(&evaluator);
    let mut settings = CanAccess::mount(
        evaluator.clone(),
        Some(Resource::Settings),
        Some(Action::Read),
        "settings-link",
    );

    assert_eq!(session.signal().subscriber_count(), 3);
    assert_eq!(delete_button.render(), Render::DefaultNotice(DEFAULT_DENIED_NOTICE));
    assert_eq!(export.render(), Render::Denied(&"export-disabled"));
    assert!(settings.render().is_nothing());

    session.sign_in(login("Guest")).unwrap();
    assert!(!delete_button.poll());
    assert!(!export.poll());
    assert!(!settings.poll());

    session.sign_in(login("Manager")).unwrap();
    assert!(delete_button.poll());
    assert!(export.poll());
    assert!(settings.poll());
    assert_eq!(delete_button.render(), Render::Content(&"delete"));
    assert_eq!(export.render(), Render::Content(&"export"));
    assert_eq!(settings.render(), Render::Content(&"settings-link"));

    session.sign_out().unwrap();
    assert!(delete_button.poll());
    assert_eq!(delete_button.state(), GateState::Rendered(Decision::Denied));

    delete_button.unmount();
    export.unmount();
    settings.unmount();
    assert_eq!(session.signal().subscriber_count(), 0);
}

#[test]
fn misconfigured_gate_logs_and_hides_content() {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();

    let session = SessionStore::new();
    session.sign_in(login("Admin")).unwrap();
    let evaluator = PermissionEvaluator::new(session.signal());

    let view = tracing::subscriber::with_default(subscriber, || {
        ProtectedAction::new("danger").action(Action::Delete).mount(&evaluator)
    });

    assert!(view.render().is_nothing());
    assert_eq!(view.state(), GateState::Rendered(Decision::Denied));
    let output = logs.contents();
    assert!(output.contains("WARN"), "{output}");
    assert!(output.contains("gate requires both resource and action"), "{output}");
}
