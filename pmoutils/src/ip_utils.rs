use get_if_addrs::get_if_addrs;
use std::net::{IpAddr, UdpSocket};

/// Devine l'adresse IP locale utilisée pour les connexions sortantes.
///
/// Crée un socket UDP lié à `0.0.0.0:0` puis le "connecte" vers un serveur DNS
/// public. Aucun paquet n'est émis : le système choisit seulement l'interface
/// qui serait utilisée pour joindre la cible.
///
/// # Returns
///
/// `None` si aucune route sortante n'existe (réseau absent, interface désactivée).
///
/// # Examples
///
/// ```no_run
/// use pmoutils::guess_local_ip;
///
/// match guess_local_ip() {
///     Some(ip) => println!("IP locale détectée: {}", ip),
///     None => println!("Pas de route sortante"),
/// }
/// ```
pub fn guess_local_ip() -> Option<IpAddr> {
    let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect("8.8.8.8:80").ok()?;
    let local_addr = socket.local_addr().ok()?;
    let ip = local_addr.ip();
    if ip.is_unspecified() { None } else { Some(ip) }
}

/// Indique si la machine possède au moins une interface réseau utilisable.
///
/// Les interfaces de loopback et les adresses IPv6 link-local sont ignorées.
/// En cas d'échec de l'énumération des interfaces, retourne `false`.
pub fn has_network_interface() -> bool {
    match get_if_addrs() {
        Ok(interfaces) => interfaces
            .iter()
            .any(|iface| is_routable(&iface.ip())),
        Err(_) => false,
    }
}

fn is_routable(ip: &IpAddr) -> bool {
    if ip.is_loopback() || ip.is_unspecified() {
        return false;
    }
    match ip {
        IpAddr::V4(_) => true,
        // fe80::/10
        IpAddr::V6(v6) => (v6.segments()[0] & 0xffc0) != 0xfe80,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[test]
    fn test_guess_local_ip_is_not_unspecified() {
        if let Some(ip) = guess_local_ip() {
            assert!(!ip.is_unspecified());
        }
    }

    #[test]
    fn test_loopback_is_not_routable() {
        assert!(!is_routable(&IpAddr::V4(Ipv4Addr::LOCALHOST)));
        assert!(!is_routable(&IpAddr::V6(Ipv6Addr::LOCALHOST)));
    }

    #[test]
    fn test_link_local_v6_is_not_routable() {
        let link_local: Ipv6Addr = "fe80::1".parse().unwrap();
        assert!(!is_routable(&IpAddr::V6(link_local)));
    }

    #[test]
    fn test_private_v4_is_routable() {
        assert!(is_routable(&IpAddr::V4(Ipv4Addr::new(192, 168, 1, 42))));
        assert!(is_routable(&IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1))));
    }

    #[test]
    fn test_global_v6_is_routable() {
        let global: Ipv6Addr = "2001:db8::1".parse().unwrap();
        assert!(is_routable(&IpAddr::V6(global)));
    }
}
