mod common;



#[cfg(test)]
mod test_get_by_kind;


#[cfg(test)]
mod test_internal_errors;
