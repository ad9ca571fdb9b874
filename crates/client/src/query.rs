use api_types::FindHostsParam;
use url::form_urlencoded;

/// Build the query string for the host search endpoint.
///
/// Unset and empty fields are left out entirely. List fields repeat their key
/// once per element, in list order. Keys are emitted in name order (`name`,
/// `role`, `service`, `status`), so equal filters always encode identically.
/// An empty filter yields an empty string.
pub fn find_hosts_query(param: &FindHostsParam) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    if let Some(name) = non_empty(param.name.as_deref()) {
        query.append_pair("name", name);
    }
    for role in &param.roles {
        query.append_pair("role", role);
    }
    if let Some(service) = non_empty(param.service.as_deref()) {
        query.append_pair("service", service);
    }
    for status in &param.statuses {
        query.append_pair("status", status.as_str());
    }
    query.finish()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_types::HostStatus;

    #[test]
    fn empty_filter_yields_empty_query() {
        assert_eq!(find_hosts_query(&FindHostsParam::default()), "");

        let blank = FindHostsParam {
            service: Some(String::new()),
            name: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(find_hosts_query(&blank), "");
    }

    #[test]
    fn repeats_role_key_in_order() {
        let param = FindHostsParam {
            roles: vec!["proxy".to_owned(), "db".to_owned(), "app".to_owned()],
            ..Default::default()
        };
        let query = find_hosts_query(&param);
        assert_eq!(query, "role=proxy&role=db&role=app");
        assert_eq!(query.matches("role=").count(), 3);
    }

    #[test]
    fn encodes_every_field() {
        let param = FindHostsParam {
            service: Some("My-Service".to_owned()),
            roles: vec!["db-master".to_owned(), "db-slave".to_owned()],
            name: Some("web 01".to_owned()),
            statuses: vec![HostStatus::Working, HostStatus::Standby],
        };
        assert_eq!(
            find_hosts_query(&param),
            "name=web+01&role=db-master&role=db-slave&service=My-Service&status=working&status=standby"
        );
    }

    #[test]
    fn form_encodes_reserved_characters() {
        let param = FindHostsParam { name: Some("a&b=c/d".to_owned()), ..Default::default() };
        assert_eq!(find_hosts_query(&param), "name=a%26b%3Dc%2Fd");
    }
}
