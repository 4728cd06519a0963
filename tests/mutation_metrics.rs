mod support;

use std::collections::HashMap;

use metrics_util::debugging::{DebugValue, DebuggingRecorder};
use postdesk::application::admin::posts::MutationRequest;
use postdesk::application::auth::CallerContext;
use postdesk::domain::posts::PostDraft;
use postdesk::infra::telemetry;

use support::{InMemoryPosts, admin, admin_service};

#[tokio::test]
async fn mutations_and_denials_are_counted() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");
    telemetry::describe_metrics();

    let store = InMemoryPosts::seeded(&[("taken", "Taken", "t")]);
    let service = admin_service(store);

    let submissions = [
        (admin(), "new", PostDraft::new("Hello", "hello", "# Hi")),
        (admin(), "new", PostDraft::new("Dup", "taken", "d")),
        (admin(), "new", PostDraft::default()),
        (CallerContext::anonymous(), "new", PostDraft::new("A", "a", "a")),
    ];
    for (caller, route, draft) in submissions {
        let _ = service
            .submit_mutation(
                &caller,
                route,
                MutationRequest {
                    intent: None,
                    draft,
                },
            )
            .await;
    }

    let counters: HashMap<String, u64> = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .filter_map(|(composite_key, _, _, value)| match value {
            DebugValue::Counter(count) => {
                let key = composite_key.key();
                let mut labels: Vec<String> = key
                    .labels()
                    .map(|label| format!("{}={}", label.key(), label.value()))
                    .collect();
                labels.sort();
                Some((format!("{}{{{}}}", key.name(), labels.join(",")), count))
            }
            _ => None,
        })
        .collect();

    assert_eq!(
        counters.get("postdesk_post_mutations_total{intent=create,outcome=saved}"),
        Some(&1)
    );
    assert_eq!(
        counters.get("postdesk_post_mutations_total{intent=create,outcome=conflict}"),
        Some(&1)
    );
    assert_eq!(
        counters.get("postdesk_post_mutations_total{intent=create,outcome=invalid}"),
        Some(&1)
    );
    assert_eq!(
        counters.get("postdesk_admin_denied_total{operation=submit}"),
        Some(&1)
    );
}
