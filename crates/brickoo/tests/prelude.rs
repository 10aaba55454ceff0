use brickoo::prelude::*;
use serde_json::json;

#[test]
fn application_from_prelude() {
    let app = Application::from_config(&BrickooConfig::default()).unwrap();

    let mut collection = RouteCollection::new();
    collection
        .add_route(
            HttpRoute::new("profile", "/users/{id}", "Users", "show")
                .with_rule("id", "[0-9]+")
                .with_method("GET"),
        )
        .unwrap();
    app.add_collection(collection).unwrap();

    app.dispatcher().attach(
        MessageListener::new("users.lookup", |message, _| {
            Ok(message.param("id").cloned())
        })
        .priority(10),
    );

    let route = app.route(&RequestInfo::get("/users/42")).unwrap();
    let id = route.parameter("id").unwrap();

    let answer = app
        .dispatcher()
        .ask(&Message::new("users.lookup").with_param("id", id))
        .unwrap();
    assert_eq!(answer, Some(json!("42")));

    assert!(matches!(
        app.route(&RequestInfo::new("DELETE", "/users/42")),
        Err(RuntimeError::Routing(RoutingError::RequestHasNoRoute { .. }))
    ));
}
