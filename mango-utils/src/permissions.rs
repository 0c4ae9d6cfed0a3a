use mango_database::AdminGrant;
use poise::serenity_prelude as serenity;
use tracing::debug;

/// Whether a member with `perms` and roles named `role_names` counts as an admin.
///
/// Admin means the `ADMINISTRATOR` permission or holding a role whose name
/// matches `admin_role_name` exactly.
pub fn is_admin<'a>(
    perms: serenity::Permissions,
    role_names: impl IntoIterator<Item = &'a str>,
    admin_role_name: &str,
) -> bool {
    perms.contains(serenity::Permissions::ADMINISTRATOR)
        || role_names.into_iter().any(|name| name == admin_role_name)
}

/// Resolve the caller's standing in the guild and issue an [`AdminGrant`] if they qualify.
///
/// The guild owner always qualifies.
pub async fn admin_grant(
    http: &serenity::Http,
    guild_id: serenity::GuildId,
    user_id: serenity::UserId,
    admin_role_name: &str,
) -> anyhow::Result<Option<AdminGrant>> {
    let guild = guild_id.to_partial_guild(http).await?;
    if guild.owner_id == user_id {
        return Ok(Some(AdminGrant::issue()));
    }

    let member = guild_id.member(http, user_id).await?;
    let roles = guild_id.roles(http).await?;

    let mut resolved = serenity::Permissions::empty();
    let mut held_names = Vec::new();
    let everyone_role_id = serenity::RoleId::new(guild_id.get());

    for role in roles.values() {
        let held = member.roles.contains(&role.id);
        if role.id == everyone_role_id || held {
            resolved |= role.permissions;
        }
        if held {
            held_names.push(role.name.as_str());
        }
    }

    let admin = is_admin(resolved, held_names, admin_role_name);
    debug!(user_id = %user_id, guild_id = %guild_id, admin, "resolved admin standing");

    Ok(admin.then(AdminGrant::issue))
}
