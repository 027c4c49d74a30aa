//! App Router

use salvo::Router;

use crate::{auth, carts, checkout, orders, reports};

pub(crate) fn app_router() -> Router {
    Router::new()
        .hoop(auth::middleware::handler)
        .push(
            Router::with_path("carts/{cart}")
                .get(carts::get::handler)
                .push(
                    Router::with_path("items")
                        .post(carts::items::create::handler)
                        .delete(carts::items::clear::handler)
                        .push(
                            Router::with_path("{product}")
                                .put(carts::items::update::handler)
                                .delete(carts::items::delete::handler),
                        ),
                ),
        )
        .push(
            Router::with_path("checkout")
                .post(checkout::start::handler)
                .push(
                    Router::with_path("{reference}")
                        .get(checkout::get::handler)
                        .delete(checkout::abandon::handler)
                        .push(Router::with_path("payment").post(checkout::payment::handler))
                        .push(Router::with_path("cancel").post(checkout::cancel::handler))
                        .push(Router::with_path("confirm").post(checkout::confirm::handler)),
                ),
        )
        .push(
            Router::with_path("orders")
                .get(orders::index::handler)
                .push(Router::with_path("{order}").get(orders::get::handler)),
        )
        .push(
            Router::with_path("admin")
                .hoop(auth::admin::handler)
                .push(
                    Router::with_path("orders")
                        .get(orders::admin_index::handler)
                        .push(
                            Router::with_path("{order}/status")
                                .put(orders::update_status::handler),
                        ),
                )
                .push(
                    Router::with_path("reports")
                        .push(Router::with_path("summary").get(reports::summary::handler))
                        .push(Router::with_path("revenue").get(reports::revenue::handler)),
                ),
        )
}
