use anyhow::Result;

use tisane_core::service::TisaneService;

pub(crate) fn cmd_visits(service: &TisaneService, json: bool) -> Result<()> {
    let visits = service.visits();
    if json {
        println!("{}", serde_json::json!({ "visits": visits }));
    } else {
        println!("Total visits: {visits}");
    }
    Ok(())
}
