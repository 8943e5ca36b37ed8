use crate::user_error::UserError;

pub(crate) fn print_user_error_human(err: &anyhow::Error) -> bool {
    let Some(user_err) = err.chain().find_map(|e| e.downcast_ref::<UserError>()) else {
        return false;
    };

    if user_err.code != "E_CHECKOUT_FAILED" {
        return false;
    }

    eprintln!("error[{}]: {}", user_err.code, user_err.message);

    let Some(details) = user_err.details.as_ref() else {
        return true;
    };

    for (label, pointer) in [
        ("transport", "/transport"),
        ("commit", "/commit_id"),
        ("working copy", "/working_copy"),
        ("build log", "/log"),
    ] {
        if let Some(value) = details.pointer(pointer).and_then(|v| v.as_str()) {
            eprintln!("  {label}: {value}");
        }
    }
    if details
        .pointer("/checkout_step_failed")
        .and_then(|v| v.as_bool())
        .unwrap_or(false)
    {
        eprintln!("  the explicit revision checkout failed; the recorded commit is whatever HEAD resolved to");
    }
    eprintln!("hint: inspect the build log for the failing git operation.");

    true
}
