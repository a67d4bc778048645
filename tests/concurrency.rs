//! Operations that are in flight at the same time.
//!
//! Replies are applied in the order they arrive. Nothing reorders or merges them: when two changes of the same item race,
//! the last reply decides what is displayed.
#![cfg(feature = "mocks")]

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;

use scenarii::*;

use parse_todo::controller::signal::SignalReceiver;
use parse_todo::controller::{ListSignal, Phase};
use parse_todo::ItemId;


fn gated_controller(items: &[parse_todo::Item]) -> (Arc<TestController<GatedRepository>>, SignalReceiver, UnboundedReceiver<&'static str>) {
    let (repo, _) = populated_repository(items);
    let (gated, arrivals) = GatedRepository::new(repo);
    let (controller, signals) = signed_in_controller(gated);
    (Arc::new(controller), signals, arrivals)
}

async fn next_signal(signals: &mut SignalReceiver) -> ListSignal {
    signals.recv().await.expect("the controller is still alive")
}


#[tokio::test]
async fn test_loading_phase() {
    let _ = env_logger::builder().is_test(true).try_init();

    let (controller, mut signals, mut arrivals) = gated_controller(&[item("1", "A", None)]);
    let release = controller.repository().hold();

    let task = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.view_appeared().await })
    };
    assert_eq!(arrivals.recv().await, Some("list"));
    assert_eq!(controller.phase(), Phase::Loading);
    assert!(controller.snapshot().is_empty());

    release.send(()).unwrap();
    task.await.unwrap().unwrap();
    assert_eq!(controller.phase(), Phase::Ready);
    assert_eq!(next_signal(&mut signals).await, ListSignal::FullReload);
    assert_eq!(titles(&controller.snapshot()), vec!["A"]);
}

/// Only the outcome of the initial fetch ends the loading phase
#[tokio::test]
async fn test_still_loading_after_other_replies() {
    let _ = env_logger::builder().is_test(true).try_init();

    let (controller, mut signals, mut arrivals) = gated_controller(&[item("1", "A", None)]);
    let release = controller.repository().hold();

    let task = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.view_appeared().await })
    };
    assert_eq!(arrivals.recv().await, Some("list"));

    // Rejected before reaching the network
    assert!(controller.submit_create("", None).await.is_err());
    assert_eq!(controller.phase(), Phase::Loading);
    // Accepted by the server while the list is still loading
    controller.submit_create("Buy milk", None).await.unwrap();
    assert_eq!(arrivals.recv().await, Some("create"));
    assert_eq!(controller.phase(), Phase::Loading);

    release.send(()).unwrap();
    task.await.unwrap().unwrap();
    assert_eq!(controller.phase(), Phase::Ready);

    let received = drain(&mut signals);
    assert!(is_error(&received[0]));
    assert_eq!(&received[1..], &[ListSignal::RowInserted(0), ListSignal::FullReload]);
    assert_eq!(titles(&controller.snapshot()), vec!["A"]);
}

/// Two renames of the same item: whichever reply arrives last wins, whatever the submission order was
#[tokio::test]
async fn test_concurrent_updates_last_reply_wins() {
    let _ = env_logger::builder().is_test(true).try_init();

    for &second_reply_first in &[false, true] {
        let (controller, mut signals, mut arrivals) = gated_controller(&[item("1", "A", None)]);
        controller.view_appeared().await.unwrap();
        assert_eq!(arrivals.recv().await, Some("list"));
        assert_eq!(next_signal(&mut signals).await, ListSignal::FullReload);

        let first_gate = controller.repository().hold();
        let second_gate = controller.repository().hold();

        let first = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit_update(&ItemId::from("1"), "X", None).await })
        };
        assert_eq!(arrivals.recv().await, Some("update"));
        let second = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit_update(&ItemId::from("1"), "Y", None).await })
        };
        assert_eq!(arrivals.recv().await, Some("update"));

        let expected = if second_reply_first {
            second_gate.send(()).unwrap();
            second.await.unwrap().unwrap();
            first_gate.send(()).unwrap();
            first.await.unwrap().unwrap();
            "X"
        } else {
            first_gate.send(()).unwrap();
            first.await.unwrap().unwrap();
            second_gate.send(()).unwrap();
            second.await.unwrap().unwrap();
            "Y"
        };

        assert_eq!(titles(&controller.snapshot()), vec![expected]);
        assert_eq!(next_signal(&mut signals).await, ListSignal::RowUpdated(0));
        assert_eq!(next_signal(&mut signals).await, ListSignal::RowUpdated(0));
    }
}

/// An update and a delete of the same item, where the delete reply arrives first: the late update must not bring the row back
#[tokio::test]
async fn test_update_then_delete_delete_replies_first() {
    let _ = env_logger::builder().is_test(true).try_init();

    let (controller, mut signals, mut arrivals) = gated_controller(&[item("1", "A", None), item("2", "B", None)]);
    controller.view_appeared().await.unwrap();
    assert_eq!(arrivals.recv().await, Some("list"));
    assert_eq!(next_signal(&mut signals).await, ListSignal::FullReload);

    let update_gate = controller.repository().hold();
    let delete_gate = controller.repository().hold();

    let update = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.submit_update(&ItemId::from("1"), "X", None).await })
    };
    assert_eq!(arrivals.recv().await, Some("update"));
    let delete = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.submit_delete(&ItemId::from("1")).await })
    };
    assert_eq!(arrivals.recv().await, Some("delete"));

    delete_gate.send(()).unwrap();
    delete.await.unwrap().unwrap();
    assert_eq!(next_signal(&mut signals).await, ListSignal::RowRemoved(0));

    update_gate.send(()).unwrap();
    update.await.unwrap().unwrap();

    assert_eq!(controller.snapshot(), vec![item("2", "B", None)]);
    assert!(drain(&mut signals).is_empty());
}

/// The same race, where the update reply arrives first: the row is renamed, then removed
#[tokio::test]
async fn test_update_then_delete_update_replies_first() {
    let _ = env_logger::builder().is_test(true).try_init();

    let (controller, mut signals, mut arrivals) = gated_controller(&[item("1", "A", None), item("2", "B", None)]);
    controller.view_appeared().await.unwrap();
    assert_eq!(arrivals.recv().await, Some("list"));
    assert_eq!(next_signal(&mut signals).await, ListSignal::FullReload);

    let update_gate = controller.repository().hold();
    let delete_gate = controller.repository().hold();

    let update = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.submit_update(&ItemId::from("1"), "X", None).await })
    };
    assert_eq!(arrivals.recv().await, Some("update"));
    let delete = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.submit_delete(&ItemId::from("1")).await })
    };
    assert_eq!(arrivals.recv().await, Some("delete"));

    update_gate.send(()).unwrap();
    update.await.unwrap().unwrap();
    assert_eq!(titles(&controller.snapshot()), vec!["X", "B"]);

    delete_gate.send(()).unwrap();
    delete.await.unwrap().unwrap();

    assert_eq!(controller.snapshot(), vec![item("2", "B", None)]);
    assert_eq!(drain(&mut signals), vec![ListSignal::RowUpdated(0), ListSignal::RowRemoved(0)]);
}

/// Two creations in flight: rows are appended in reply order
#[tokio::test]
async fn test_concurrent_creations_follow_reply_order() {
    let _ = env_logger::builder().is_test(true).try_init();

    let (controller, mut signals, mut arrivals) = gated_controller(&[]);
    controller.view_appeared().await.unwrap();
    assert_eq!(arrivals.recv().await, Some("list"));
    assert_eq!(next_signal(&mut signals).await, ListSignal::FullReload);

    let milk_gate = controller.repository().hold();
    let bread_gate = controller.repository().hold();

    let milk = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.submit_create("Buy milk", None).await })
    };
    assert_eq!(arrivals.recv().await, Some("create"));
    let bread = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.submit_create("Buy bread", None).await })
    };
    assert_eq!(arrivals.recv().await, Some("create"));

    bread_gate.send(()).unwrap();
    bread.await.unwrap().unwrap();
    milk_gate.send(()).unwrap();
    milk.await.unwrap().unwrap();

    assert_eq!(titles(&controller.snapshot()), vec!["Buy bread", "Buy milk"]);
    assert_eq!(drain(&mut signals), vec![ListSignal::RowInserted(0), ListSignal::RowInserted(1)]);
}

/// A reply that arrives after the screen has been left changes nothing
#[tokio::test]
async fn test_late_reply_is_ignored() {
    let _ = env_logger::builder().is_test(true).try_init();

    let (controller, mut signals, mut arrivals) = gated_controller(&[item("1", "A", None)]);
    controller.view_appeared().await.unwrap();
    assert_eq!(arrivals.recv().await, Some("list"));
    assert_eq!(next_signal(&mut signals).await, ListSignal::FullReload);

    let gate = controller.repository().hold();
    let create = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.submit_create("Buy milk", None).await })
    };
    assert_eq!(arrivals.recv().await, Some("create"));

    controller.view_disappeared();
    gate.send(()).unwrap();
    // The server did create it...
    let created = create.await.unwrap().unwrap();
    assert!(controller.repository().inner().contents().contains(&created));
    // ...but the screen that asked for it is gone
    assert_eq!(titles(&controller.snapshot()), vec!["A"]);
    assert_eq!(controller.phase(), Phase::Idle);
    assert!(drain(&mut signals).is_empty());

    // Coming back shows it
    controller.view_appeared().await.unwrap();
    assert_eq!(titles(&controller.snapshot()), vec!["A", "Buy milk"]);
}

/// A full fetch whose reply comes after a creation reply already contains the new item: it is not duplicated
#[tokio::test]
async fn test_fetch_racing_with_create() {
    let _ = env_logger::builder().is_test(true).try_init();

    let (controller, mut signals, mut arrivals) = gated_controller(&[item("1", "A", None)]);
    controller.view_appeared().await.unwrap();
    assert_eq!(arrivals.recv().await, Some("list"));
    assert_eq!(next_signal(&mut signals).await, ListSignal::FullReload);

    let create_gate = controller.repository().hold();
    let fetch_gate = controller.repository().hold();

    let create = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.submit_create("Buy milk", None).await })
    };
    assert_eq!(arrivals.recv().await, Some("create"));
    let fetch = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.fetch_all().await })
    };
    assert_eq!(arrivals.recv().await, Some("list"));

    fetch_gate.send(()).unwrap();
    fetch.await.unwrap().unwrap();
    assert_eq!(titles(&controller.snapshot()), vec!["A", "Buy milk"]);

    create_gate.send(()).unwrap();
    create.await.unwrap().unwrap();
    assert_eq!(titles(&controller.snapshot()), vec!["A", "Buy milk"]);
    assert_eq!(drain(&mut signals), vec![ListSignal::FullReload, ListSignal::RowUpdated(1)]);
}
